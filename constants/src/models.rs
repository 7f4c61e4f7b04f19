pub const DEFAULT_ASSETS_ROOT: &str = "assets";
pub const DEFAULT_MODELS_DIR: &str = "models";
pub const SCENE_CONFIG_PATH: &str = "config/scene.json";
pub const PHONG_SHADER_PATH: &str = "shaders/phong.wgsl";

pub const CAR_MODELS: &[&str] = &["car_sedan", "car_van"];
pub const OBSTACLE_MODELS: &[&str] = &["building", "tree"];
pub const TRAFFIC_LIGHT_MODEL: &str = "traffic_light";
pub const ROAD_MODEL: &str = "road";
pub const DESTINATION_MODEL: &str = "destination";

/// Cache name of the built-in cube used when a model cannot be loaded.
pub const FALLBACK_MODEL: &str = "__fallback_cube";
