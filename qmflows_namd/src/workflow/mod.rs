/// Implements `Serialize`/`Deserialize` through `Display`/`FromStr` for the keyword enums of the
/// workflow input, so that parsing stays case-insensitive while the written form is canonical.
macro_rules! serde_via_str {
    ($t:ty) => {
        impl serde::Serialize for $t {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where S: serde::Serializer {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $t {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where D: serde::Deserializer<'de> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(<D::Error as serde::de::Error>::custom)
            }
        }
    };
}

mod cp2k;
pub use cp2k::Cp2kGeneralSettings;

mod scheduler;
pub use scheduler::{
    JobScheduler,
    Scheduler,
};

mod config;
pub use config::{
    Algorithm,
    GuessStrategy,
    Workflow,
    WorkflowConfig,
};
