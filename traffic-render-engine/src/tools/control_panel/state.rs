use bevy::prelude::*;
use constants::camera::{PANEL_ANGLE_STEP, PANEL_DISTANCE_STEP, PANEL_TARGET_STEP};

use crate::engine::camera::orbit_camera::OrbitCamera;

// Resources
#[derive(Resource)]
pub struct ControlPanelState {
    pub collapsed: bool,
    pub open_width: f32,
    pub closed_width: f32,
}
impl Default for ControlPanelState {
    fn default() -> Self {
        Self {
            collapsed: false,
            open_width: 260.0,
            closed_width: 32.0,
        }
    }
}

/// Camera parameters exposed for editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraParam {
    Distance,
    Azimuth,
    Elevation,
    TargetX,
    TargetY,
    TargetZ,
}

impl CameraParam {
    pub const ALL: [CameraParam; 6] = [
        CameraParam::Distance,
        CameraParam::Azimuth,
        CameraParam::Elevation,
        CameraParam::TargetX,
        CameraParam::TargetY,
        CameraParam::TargetZ,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CameraParam::Distance => "Distance",
            CameraParam::Azimuth => "Azimuth",
            CameraParam::Elevation => "Elevation",
            CameraParam::TargetX => "Target X",
            CameraParam::TargetY => "Target Y",
            CameraParam::TargetZ => "Target Z",
        }
    }

    pub fn step(self) -> f32 {
        match self {
            CameraParam::Distance => PANEL_DISTANCE_STEP,
            CameraParam::Azimuth | CameraParam::Elevation => PANEL_ANGLE_STEP,
            CameraParam::TargetX | CameraParam::TargetY | CameraParam::TargetZ => PANEL_TARGET_STEP,
        }
    }

    pub fn read(self, camera: &OrbitCamera) -> f32 {
        match self {
            CameraParam::Distance => camera.distance(),
            CameraParam::Azimuth => camera.azimuth(),
            CameraParam::Elevation => camera.elevation(),
            CameraParam::TargetX => camera.target().x,
            CameraParam::TargetY => camera.target().y,
            CameraParam::TargetZ => camera.target().z,
        }
    }

    /// Write through the camera's clamping setters.
    pub fn write(self, camera: &mut OrbitCamera, value: f32) {
        let mut target = camera.target();
        match self {
            CameraParam::Distance => camera.set_distance(value),
            CameraParam::Azimuth => camera.set_azimuth(value),
            CameraParam::Elevation => camera.set_elevation(value),
            CameraParam::TargetX => {
                target.x = value;
                camera.set_target(target);
            }
            CameraParam::TargetY => {
                target.y = value;
                camera.set_target(target);
            }
            CameraParam::TargetZ => {
                target.z = value;
                camera.set_target(target);
            }
        }
    }

    /// Nudge by one step in `direction` (+1 or -1).
    pub fn nudge(self, camera: &mut OrbitCamera, direction: f32) {
        let value = self.read(camera) + self.step() * direction.signum();
        self.write(camera, value);
    }
}

// Components
#[derive(Component)]
pub struct ControlPanelRoot;
#[derive(Component)]
pub struct ControlPanelBody;
#[derive(Component)]
pub struct HeaderNode;
#[derive(Component)]
pub struct TitleText;
#[derive(Component)]
pub struct CollapseButton;
#[derive(Component)]
pub struct CollapseLabel;
#[derive(Component)]
pub struct ParamValueText(pub CameraParam);
#[derive(Component)]
pub struct ParamStepButton {
    pub param: CameraParam,
    pub direction: f32,
}
#[derive(Component)]
pub struct ResetCameraButton;
#[derive(Component)]
pub struct MetricsText;
#[derive(Component)]
pub struct StatusText;
