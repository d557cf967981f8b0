use serde_json::{Map, Value as JsonValue};
use serde_yaml::Value as YamlValue;

/// Lifecycle state as reported by `docker compose ps`, plus the synthetic
/// `disabled` state for services declared in compose files with no live
/// container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Running,
    Exited,
    Paused,
    Disabled,
    Unknown,
}

impl ContainerState {
    pub fn from_label(label: &str) -> Self {
        match label {
            "running" => Self::Running,
            "exited" => Self::Exited,
            "paused" => Self::Paused,
            "disabled" => Self::Disabled,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Exited => "exited",
            Self::Paused => "paused",
            Self::Disabled => "disabled",
            Self::Unknown => "unknown",
        }
    }

    /// Actions offered for a container in this state. Order matters for
    /// display.
    pub fn actions(self) -> &'static [Action] {
        match self {
            Self::Running => RUNNING_ACTIONS,
            Self::Exited => EXITED_ACTIONS,
            Self::Paused => PAUSED_ACTIONS,
            Self::Disabled => DISABLED_ACTIONS,
            Self::Unknown => DEFAULT_ACTIONS,
        }
    }
}

/// Per-service action, each backed by a route of the same name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Stop,
    Rm,
    Logs,
    Top,
    Pause,
    Unpause,
    Restart,
    Kill,
    Pull,
    Build,
    Compose,
    Exec,
    Run,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Stop => "stop",
            Self::Rm => "rm",
            Self::Logs => "logs",
            Self::Top => "top",
            Self::Pause => "pause",
            Self::Unpause => "unpause",
            Self::Restart => "restart",
            Self::Kill => "kill",
            Self::Pull => "pull",
            Self::Build => "build",
            Self::Compose => "compose",
            Self::Exec => "exec",
            Self::Run => "run",
        }
    }
}

pub const RUNNING_ACTIONS: &[Action] = &[
    Action::Stop,
    Action::Compose,
    Action::Logs,
    Action::Pause,
    Action::Kill,
    Action::Pull,
    Action::Build,
    Action::Restart,
    Action::Top,
    Action::Exec,
];

pub const EXITED_ACTIONS: &[Action] = &[
    Action::Up,
    Action::Compose,
    Action::Logs,
    Action::Rm,
    Action::Pull,
    Action::Build,
    Action::Run,
];

pub const PAUSED_ACTIONS: &[Action] = &[Action::Unpause, Action::Kill, Action::Stop];

pub const DISABLED_ACTIONS: &[Action] =
    &[Action::Up, Action::Compose, Action::Pull, Action::Build];

pub const DEFAULT_ACTIONS: &[Action] =
    &[Action::Up, Action::Compose, Action::Build, Action::Pull];

/// One row in the index view: live container fields merged with the
/// service's declared compose configuration.
///
/// `live` carries whatever `docker compose ps` reported, verbatim; it is
/// `None` exactly when the record was synthesized for a disabled service.
#[derive(Debug, Clone)]
pub struct ContainerRecord {
    pub service: String,
    pub state: ContainerState,
    pub live: Option<Map<String, JsonValue>>,
    pub compose: Option<YamlValue>,
    pub actions: &'static [Action],
}

impl ContainerRecord {
    /// String-valued field from the live `ps` record, if any
    pub fn live_str(&self, key: &str) -> Option<&str> {
        self.live.as_ref()?.get(key)?.as_str()
    }
}
