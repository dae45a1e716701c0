//! Secret backends for reading the Runscope API token.
//!
//! Each backend is driven by its own `RUNSCOPE_*` environment variables and
//! shells out to the vendor CLI. A backend that is not configured, or whose
//! command fails, yields `None`.

use std::process::{Command, Stdio};

/// A password manager CLI able to hand out the API token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretBackend {
    /// 1Password CLI (`op read`).
    ///
    /// - `RUNSCOPE_OP_ENTRY_PATH`: `op://Vault/Item`
    /// - or `RUNSCOPE_OP_VAULT` + `RUNSCOPE_OP_ITEM`
    /// - `RUNSCOPE_OP_FIELD`: field name (default `API_TOKEN`)
    OnePassword,
    /// Bitwarden CLI (`bw get password`).
    ///
    /// - `RUNSCOPE_BW_ITEM_ID`: login item UUID
    /// - `RUNSCOPE_BW_SESSION`: optional session key, passed on as `BW_SESSION`
    Bitwarden,
    /// KeePassXC CLI (`keepassxc-cli show`).
    ///
    /// - `RUNSCOPE_KPXC_DB`: path to the .kdbx database
    /// - `RUNSCOPE_KPXC_ENTRY`: entry title or path
    /// - `RUNSCOPE_KPXC_ATTRIBUTE`: attribute (default `Password`)
    KeePassXc,
}

/// A fully resolved backend invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretCommand {
    pub program: &'static str,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl SecretBackend {
    /// Lookup order used by [`crate::helpers::get_api_token`].
    pub const ALL: [SecretBackend; 3] = [
        SecretBackend::OnePassword,
        SecretBackend::Bitwarden,
        SecretBackend::KeePassXc,
    ];

    /// Read the token through this backend using the process environment.
    pub fn read(self) -> Option<String> {
        self.command_with(env_var)?.run()
    }

    /// Build the command for this backend, resolving settings with `lookup`.
    /// Returns `None` when the backend is not configured.
    pub fn command_with<F>(self, lookup: F) -> Option<SecretCommand>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        match self {
            SecretBackend::OnePassword => {
                let field = match lookup("RUNSCOPE_OP_FIELD") {
                    Some(f) => f.trim().to_string(),
                    None => "API_TOKEN".to_string(),
                };
                if field.is_empty() {
                    return None;
                }
                let uri = match get("RUNSCOPE_OP_ENTRY_PATH") {
                    Some(path) => format!("{}/{}", path.trim_end_matches('/'), field),
                    None => format!(
                        "op://{}/{}/{}",
                        get("RUNSCOPE_OP_VAULT")?,
                        get("RUNSCOPE_OP_ITEM")?,
                        field
                    ),
                };
                Some(SecretCommand {
                    program: "op",
                    args: vec!["read".to_string(), uri],
                    env: Vec::new(),
                })
            }
            SecretBackend::Bitwarden => {
                let id = get("RUNSCOPE_BW_ITEM_ID")?;
                let env = get("RUNSCOPE_BW_SESSION")
                    .map(|s| ("BW_SESSION".to_string(), s))
                    .into_iter()
                    .collect();
                Some(SecretCommand {
                    program: "bw",
                    args: vec!["get".to_string(), "password".to_string(), id],
                    env,
                })
            }
            SecretBackend::KeePassXc => {
                let db = get("RUNSCOPE_KPXC_DB")?;
                let entry = get("RUNSCOPE_KPXC_ENTRY")?;
                let attr = match lookup("RUNSCOPE_KPXC_ATTRIBUTE") {
                    Some(a) => a.trim().to_string(),
                    None => "Password".to_string(),
                };
                if attr.is_empty() {
                    return None;
                }
                Some(SecretCommand {
                    program: "keepassxc-cli",
                    args: vec!["show".to_string(), "-a".to_string(), attr, db, entry],
                    env: Vec::new(),
                })
            }
        }
    }
}

impl SecretCommand {
    /// Run the command; stderr is discarded so secrets never reach the terminal.
    pub fn run(&self) -> Option<String> {
        let out = Command::new(self.program)
            .args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .ok()?;
        if !out.status.success() {
            return None;
        }
        String::from_utf8(out.stdout)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
