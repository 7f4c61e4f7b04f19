use bevy::prelude::*;

use super::state::*;
use crate::client::snapshot::SimulationMetrics;
use crate::engine::core::app_state::{AppState, FpsText};
use crate::engine::loading::progress::SessionProgress;
use crate::engine::scene::scene_graph::SceneGraph;

const BUTTON_COLOUR: Color = Color::srgb(0.22, 0.24, 0.28);
const BORDER_COLOUR: Color = Color::srgba(0.0, 0.0, 0.0, 0.25);
const TEXT_COLOUR: Color = Color::srgb(1.0, 1.0, 1.0);
const MUTED_TEXT_COLOUR: Color = Color::srgb(0.70, 0.72, 0.76);

// Spawns the Control Panel with header, camera rows and readouts
pub fn spawn_control_panel_ui(mut commands: Commands, state: Res<ControlPanelState>) {
    let width = if state.collapsed { state.closed_width } else { state.open_width };
    let body_display = if state.collapsed { Display::None } else { Display::Flex };

    commands
        .spawn((
            ControlPanelRoot,
            Name::new("ControlPanel"),
            BackgroundColor(Color::srgb(0.10, 0.11, 0.13)),
            Node {
                width: Val::Px(width),
                min_width: Val::Px(0.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                right: Val::Px(0.0),
                top: Val::Px(0.0),
                bottom: Val::Px(0.0),
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Stretch,
                justify_content: JustifyContent::FlexStart,
                overflow: Overflow::clip(),
                ..default()
            },
        ))
        .with_children(|parent| {
            let (pad, btn) = if state.collapsed { (4.0, 24.0) } else { (12.0, 28.0) };

            parent
                .spawn((
                    HeaderNode,
                    Name::new("Header"),
                    BackgroundColor(Color::srgb(0.14, 0.16, 0.20)),
                    Node {
                        width: Val::Percent(100.0),
                        padding: UiRect::all(Val::Px(pad)),
                        display: Display::Flex,
                        align_items: AlignItems::Center,
                        justify_content: if state.collapsed { JustifyContent::FlexEnd } else { JustifyContent::SpaceBetween },
                        ..default()
                    },
                ))
                .with_children(|header| {
                    header.spawn((
                        TitleText,
                        Name::new("Title"),
                        Text::new("Simulation"),
                        TextFont { font_size: 18.0, ..default() },
                        TextColor(TEXT_COLOUR),
                        Node { display: if state.collapsed { Display::None } else { Display::Flex }, ..default() },
                    ));

                    let chevron = if state.collapsed { "<" } else { ">" };
                    header
                        .spawn((
                            CollapseButton,
                            Name::new("CollapseButton"),
                            Button,
                            BackgroundColor(BUTTON_COLOUR),
                            BorderColor(BORDER_COLOUR),
                            Node {
                                width: Val::Px(btn),
                                height: Val::Px(btn),
                                display: Display::Flex,
                                align_items: AlignItems::Center,
                                justify_content: JustifyContent::Center,
                                border: UiRect::all(Val::Px(1.0)),
                                ..default()
                            },
                        ))
                        .with_children(|btn_parent| {
                            btn_parent.spawn((
                                CollapseLabel,
                                Text::new(chevron),
                                TextFont { font_size: 18.0, ..default() },
                                TextColor(TEXT_COLOUR),
                            ));
                        });
                });

            parent
                .spawn((
                    ControlPanelBody,
                    Name::new("Body"),
                    BackgroundColor(Color::srgb(0.12, 0.13, 0.15)),
                    Node {
                        width: Val::Percent(100.0),
                        height: Val::Percent(100.0),
                        padding: UiRect::axes(Val::Px(12.0), Val::Px(8.0)),
                        row_gap: Val::Px(8.0),
                        display: body_display,
                        flex_direction: FlexDirection::Column,
                        overflow: Overflow::clip_y(),
                        ..default()
                    },
                ))
                .with_children(|body| {
                    body.spawn((
                        StatusText,
                        Text::new("Loading config"),
                        TextFont { font_size: 14.0, ..default() },
                        TextColor(MUTED_TEXT_COLOUR),
                    ));
                    body.spawn((
                        MetricsText,
                        Text::new(format_metrics(&SimulationMetrics::default())),
                        TextFont { font_size: 14.0, ..default() },
                        TextColor(TEXT_COLOUR),
                    ));

                    body.spawn((
                        Text::new("Camera"),
                        TextFont { font_size: 16.0, ..default() },
                        TextColor(TEXT_COLOUR),
                    ));
                    for param in CameraParam::ALL {
                        spawn_param_row(body, param);
                    }

                    body.spawn((
                        ResetCameraButton,
                        Button,
                        Name::new("ResetCameraButton"),
                        BackgroundColor(BUTTON_COLOUR),
                        BorderColor(BORDER_COLOUR),
                        Node {
                            width: Val::Percent(100.0),
                            height: Val::Px(32.0),
                            display: Display::Flex,
                            align_items: AlignItems::Center,
                            justify_content: JustifyContent::Center,
                            border: UiRect::all(Val::Px(1.0)),
                            ..default()
                        },
                    ))
                    .with_children(|btn| {
                        btn.spawn((
                            Text::new("Reset Camera"),
                            TextFont { font_size: 16.0, ..default() },
                            TextColor(TEXT_COLOUR),
                        ));
                    });

                    body.spawn((
                        FpsText,
                        Text::new("FPS: "),
                        TextFont { font_size: 14.0, ..default() },
                        TextColor(MUTED_TEXT_COLOUR),
                    ));
                });
        });
}

// Label, minus button, value readout, plus button
fn spawn_param_row(body: &mut ChildSpawnerCommands, param: CameraParam) {
    body.spawn((
        Name::new(param.label()),
        Node {
            width: Val::Percent(100.0),
            display: Display::Flex,
            align_items: AlignItems::Center,
            column_gap: Val::Px(6.0),
            ..default()
        },
    ))
    .with_children(|row| {
        row.spawn((
            Text::new(param.label()),
            TextFont { font_size: 14.0, ..default() },
            TextColor(MUTED_TEXT_COLOUR),
            Node { width: Val::Px(80.0), ..default() },
        ));
        spawn_step_button(row, param, -1.0);
        row.spawn((
            ParamValueText(param),
            Text::new("-"),
            TextFont { font_size: 14.0, ..default() },
            TextColor(TEXT_COLOUR),
            Node { width: Val::Px(64.0), justify_content: JustifyContent::Center, ..default() },
        ));
        spawn_step_button(row, param, 1.0);
    });
}

fn spawn_step_button(row: &mut ChildSpawnerCommands, param: CameraParam, direction: f32) {
    row.spawn((
        ParamStepButton { param, direction },
        Button,
        BackgroundColor(BUTTON_COLOUR),
        BorderColor(BORDER_COLOUR),
        Node {
            width: Val::Px(24.0),
            height: Val::Px(24.0),
            display: Display::Flex,
            align_items: AlignItems::Center,
            justify_content: JustifyContent::Center,
            border: UiRect::all(Val::Px(1.0)),
            ..default()
        },
    ))
    .with_children(|btn| {
        btn.spawn((
            Text::new(if direction < 0.0 { "-" } else { "+" }),
            TextFont { font_size: 16.0, ..default() },
            TextColor(TEXT_COLOUR),
        ));
    });
}

pub fn apply_collapse_state(
    state: Res<ControlPanelState>,
    mut nodes: ParamSet<(
        Query<&mut Node, With<ControlPanelRoot>>,
        Query<&mut Node, With<ControlPanelBody>>,
        Query<&mut Node, With<HeaderNode>>,
        Query<&mut Node, With<TitleText>>,
        Query<&mut Node, With<CollapseButton>>,
    )>,
    mut chevrons: Query<&mut Text, With<CollapseLabel>>,
) {
    if !state.is_changed() { return; }

    if let Ok(mut n) = nodes.p0().single_mut() {
        n.width = Val::Px(if state.collapsed { state.closed_width } else { state.open_width });
    }
    if let Ok(mut n) = nodes.p1().single_mut() {
        n.display = if state.collapsed { Display::None } else { Display::Flex };
    }
    if let Ok(mut n) = nodes.p2().single_mut() {
        let pad = if state.collapsed { 4.0 } else { 12.0 };
        n.padding = UiRect::all(Val::Px(pad));
        n.justify_content = if state.collapsed { JustifyContent::FlexEnd } else { JustifyContent::SpaceBetween };
    }
    if let Ok(mut n) = nodes.p3().single_mut() {
        n.display = if state.collapsed { Display::None } else { Display::Flex };
    }
    if let Ok(mut n) = nodes.p4().single_mut() {
        let s = if state.collapsed { 24.0 } else { 28.0 };
        n.width = Val::Px(s);
        n.height = Val::Px(s);
    }
    for mut t in &mut chevrons {
        *t = Text::new(if state.collapsed { "<" } else { ">" });
    }
}

pub fn format_param(param: CameraParam, value: f32) -> String {
    match param {
        CameraParam::Azimuth | CameraParam::Elevation => format!("{:.0}°", value.to_degrees()),
        _ => format!("{value:.1}"),
    }
}

pub fn format_metrics(metrics: &SimulationMetrics) -> String {
    format!(
        "Step: {}\nActive cars: {}\nSpawned: {}\nArrived: {}",
        metrics.current_step,
        metrics.current_active_cars,
        metrics.total_spawned,
        metrics.total_reached_destination
    )
}

pub fn reflect_camera_values(
    scene: Res<SceneGraph>,
    mut q: Query<(&ParamValueText, &mut Text)>,
) {
    if !scene.is_changed() { return; }
    let camera = scene.camera();
    for (value, mut t) in &mut q {
        let label = format_param(value.0, value.0.read(camera));
        if t.0 != label { t.0 = label; }
    }
}

pub fn reflect_metrics(
    metrics: Res<SimulationMetrics>,
    mut q: Query<&mut Text, With<MetricsText>>,
) {
    if !metrics.is_changed() { return; }
    if let Ok(mut t) = q.single_mut() {
        t.0 = format_metrics(&metrics);
    }
}

pub fn reflect_status(
    state: Res<State<AppState>>,
    progress: Res<SessionProgress>,
    scene: Res<SceneGraph>,
    mut q: Query<&mut Text, With<StatusText>>,
) {
    let label = match state.get() {
        AppState::Connecting if progress.bootstrap_attempts > 1 => {
            format!("Connecting (attempt {})", progress.bootstrap_attempts)
        }
        AppState::Running => format!("Running: {} objects", scene.len()),
        other => other.label().to_string(),
    };
    if let Ok(mut t) = q.single_mut() {
        if t.0 != label { t.0 = label; }
    }
}
