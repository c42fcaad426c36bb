//! Unix socket server for admin commands.
//!
//! Local IPC for managing who can sign in, used to bootstrap the first admin
//! before anyone can reach the HTTP user endpoints.

use crate::api::AppState;
use crate::error::Result;
use crate::models::{NewUser, Role};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};

/// Admin command sent over the socket.
#[derive(Debug, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum AdminCommand {
    AddUser {
        name: Option<String>,
        email: String,
        #[serde(default = "default_role")]
        role: Role,
    },
    SetRole {
        user_id: String,
        role: Role,
    },
    RemoveUser {
        user_id: String,
    },
    ListUsers,
    /// Health check
    Ping,
}

fn default_role() -> Role {
    Role::User
}

/// Response from admin command.
#[derive(Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdminResponse {
    Ok { message: String },
    Error { error: String },
    List { items: Vec<String> },
    Pong,
}

/// Admin socket server.
pub struct AdminSocket {
    state: AppState,
    socket_path: PathBuf,
}

impl AdminSocket {
    pub fn new(state: AppState, socket_path: impl AsRef<Path>) -> Self {
        Self {
            state,
            socket_path: socket_path.as_ref().to_path_buf(),
        }
    }

    /// Accept connections until the task is dropped.
    pub async fn run(&self) -> Result<()> {
        // Remove existing socket file if present
        let _ = std::fs::remove_file(&self.socket_path);

        let listener = UnixListener::bind(&self.socket_path)?;
        tracing::info!("Admin socket listening on {:?}", self.socket_path);

        loop {
            match listener.accept().await {
                Ok((stream, _)) => {
                    let state = self.state.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, state).await {
                            tracing::error!("Admin connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    tracing::error!("Failed to accept admin connection: {}", e);
                }
            }
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

async fn handle_connection(stream: UnixStream, state: AppState) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    while reader.read_line(&mut line).await? > 0 {
        let response = match serde_json::from_str::<AdminCommand>(&line) {
            Ok(cmd) => execute_command(cmd, &state).await,
            Err(e) => AdminResponse::Error {
                error: format!("Invalid command: {}", e),
            },
        };

        let response_json = serde_json::to_string(&response)? + "\n";
        writer.write_all(response_json.as_bytes()).await?;
        line.clear();
    }

    Ok(())
}

fn error(e: crate::Error) -> AdminResponse {
    AdminResponse::Error {
        error: e.to_string(),
    }
}

pub async fn execute_command(cmd: AdminCommand, state: &AppState) -> AdminResponse {
    match cmd {
        AdminCommand::AddUser { name, email, role } => {
            let state = state.write().await;
            match state.club.add_user(NewUser { name, email, role }) {
                Ok(user) => AdminResponse::Ok {
                    message: format!("Added {:?} {} ({})", user.role, user.email, user.id),
                },
                Err(e) => error(e),
            }
        }

        AdminCommand::SetRole { user_id, role } => {
            let state = state.write().await;
            match state.club.set_role(&user_id, role) {
                Ok(user) => AdminResponse::Ok {
                    message: format!("{} is now {:?}", user.email, user.role),
                },
                Err(e) => error(e),
            }
        }

        AdminCommand::RemoveUser { user_id } => {
            let state = state.write().await;
            match state.club.remove_user(&user_id) {
                Ok(()) => AdminResponse::Ok {
                    message: format!("Removed user {}", user_id),
                },
                Err(e) => error(e),
            }
        }

        AdminCommand::ListUsers => {
            let state = state.read().await;
            match state.club.list_users() {
                Ok(users) => AdminResponse::List {
                    items: users
                        .into_iter()
                        .map(|u| format!("{}  {:?}  {}  {}", u.id, u.role, u.email, u.name))
                        .collect(),
                },
                Err(e) => error(e),
            }
        }

        AdminCommand::Ping => AdminResponse::Pong,
    }
}

/// Socket path the node uses under the current environment.
pub fn default_socket_path() -> PathBuf {
    if let Ok(path) = std::env::var("EXPEDICAO_ADMIN_SOCKET") {
        return PathBuf::from(path);
    }
    let data_dir =
        std::env::var("EXPEDICAO_DATA_DIR").unwrap_or_else(|_| "./expedicao-data".to_string());
    PathBuf::from(data_dir).join("admin.sock")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeConfig, NodeState};
    use crate::storage::Storage;
    use crate::Club;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    fn state(dir: &Path) -> AppState {
        let storage = Arc::new(Storage::open(dir).unwrap());
        Arc::new(RwLock::new(NodeState {
            club: Club::new(storage),
            config: NodeConfig::with_data_dir(dir),
        }))
    }

    fn command(json: &str) -> AdminCommand {
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn bootstrap_first_admin() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(dir.path());

        let added = execute_command(
            command(r#"{"cmd":"add_user","email":"presidente@clube.com","role":"Admin"}"#),
            &state,
        )
        .await;
        assert!(matches!(added, AdminResponse::Ok { .. }));

        let AdminResponse::List { items } = execute_command(AdminCommand::ListUsers, &state).await
        else {
            panic!("expected a list");
        };
        assert_eq!(items.len(), 1);
        assert!(items[0].contains("presidente@clube.com"));

        let id = state.read().await.club.list_users().unwrap()[0].id.clone();
        let refused = execute_command(AdminCommand::RemoveUser { user_id: id }, &state).await;
        assert!(matches!(refused, AdminResponse::Error { .. }));
    }

    #[tokio::test]
    async fn serves_newline_delimited_json() {
        let dir = tempfile::tempdir().unwrap();
        let socket = AdminSocket::new(state(dir.path()), dir.path().join("admin.sock"));
        let path = socket.socket_path().to_path_buf();
        tokio::spawn(async move { socket.run().await });

        let mut stream = None;
        for _ in 0..50 {
            if let Ok(s) = UnixStream::connect(&path).await {
                stream = Some(s);
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        let (reader, mut writer) = stream.expect("socket never came up").into_split();
        let mut reader = BufReader::new(reader);

        writer.write_all(b"{\"cmd\":\"ping\"}\n").await.unwrap();
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        assert_eq!(line.trim(), r#"{"status":"pong"}"#);

        writer.write_all(b"{\"cmd\":\"fly\"}\n").await.unwrap();
        line.clear();
        reader.read_line(&mut line).await.unwrap();
        assert!(line.contains("\"status\":\"error\""));
    }
}
