use llmsh_app::CommandInput;
use serde::{Deserialize, Deserializer};

/// JSON object the shell plugin writes to stdin.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommandRequest {
    /// Informational; the subcommand decides which operation runs.
    pub method: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub history: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub cwd: String,
    #[serde(deserialize_with = "null_as_default")]
    pub git_branch: String,
    #[serde(deserialize_with = "null_as_default")]
    pub os_info: String,
    #[serde(deserialize_with = "null_as_default")]
    pub prefix: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    pub timestamp: Option<i64>,
}

impl From<CommandRequest> for CommandInput {
    fn from(req: CommandRequest) -> Self {
        CommandInput {
            history: req.history,
            cwd: req.cwd,
            git_branch: req.git_branch,
            os_info: req.os_info,
            prefix: req.prefix,
            description: req.description,
        }
    }
}

/// An explicit `null` reads the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
