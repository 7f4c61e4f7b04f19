pub const DEFAULT_SERVER_URL: &str = "http://localhost:8585";

pub const INIT: &str = "/init";
pub const UPDATE: &str = "/update";
pub const METRICS: &str = "/getMetrics";

pub const CARS: &str = "/getAgents";
pub const OBSTACLES: &str = "/getObstacles";
pub const TRAFFIC_LIGHTS: &str = "/getTrafficLights";
pub const ROADS: &str = "/getRoads";
pub const DESTINATIONS: &str = "/getDestinations";

/// Key of the initial agent count in the init request body.
pub const INIT_AGENT_COUNT_FIELD: &str = "NAgents";
