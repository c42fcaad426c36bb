//! expedicao-admin CLI tool
//!
//! Manages who can sign in to the expedition node.
//!
//! Usage:
//!   expedicao-admin add-user <email> [role] [name...]
//!   expedicao-admin set-role <user_id> <role>
//!   expedicao-admin remove-user <user_id>
//!   expedicao-admin list-users
//!   expedicao-admin ping

use expedicao_node::admin_socket::default_socket_path;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;

/// Admin command sent over the socket.
#[derive(Debug, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
enum AdminCommand {
    AddUser {
        name: Option<String>,
        email: String,
        role: String,
    },
    SetRole {
        user_id: String,
        role: String,
    },
    RemoveUser {
        user_id: String,
    },
    ListUsers,
    Ping,
}

/// Response from admin command.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum AdminResponse {
    Ok { message: String },
    Error { error: String },
    List { items: Vec<String> },
    Pong,
}

fn print_usage() {
    eprintln!("expedicao-admin - Manage expedition node users");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  expedicao-admin add-user <email> [role] [name...]  Add a user (role: admin, editor, user)");
    eprintln!("  expedicao-admin set-role <user_id> <role>          Change a user's role");
    eprintln!("  expedicao-admin remove-user <user_id>              Remove a user");
    eprintln!("  expedicao-admin list-users                         List all users");
    eprintln!("  expedicao-admin ping                               Check if the node is running");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  EXPEDICAO_ADMIN_SOCKET  Path to admin socket (default: <data_dir>/admin.sock)");
    eprintln!("  EXPEDICAO_DATA_DIR      Node data directory (default: ./expedicao-data)");
}

/// Roles go over the wire the way the node stores them.
fn role_name(arg: &str) -> Result<String, String> {
    match arg.to_ascii_lowercase().as_str() {
        "admin" => Ok("Admin".into()),
        "editor" => Ok("Editor".into()),
        "user" => Ok("User".into()),
        other => Err(format!("unknown role {} (expected admin, editor or user)", other)),
    }
}

fn send_command(cmd: AdminCommand) -> Result<AdminResponse, String> {
    let socket_path = default_socket_path();

    let mut stream = UnixStream::connect(&socket_path).map_err(|e| {
        format!(
            "Failed to connect to expedicao-node at {:?}: {}\n\
             Is expedicao-node running?",
            socket_path, e
        )
    })?;

    let cmd_json = serde_json::to_string(&cmd).map_err(|e| e.to_string())?;
    writeln!(stream, "{}", cmd_json).map_err(|e| e.to_string())?;

    let mut reader = BufReader::new(&stream);
    let mut response_line = String::new();
    reader
        .read_line(&mut response_line)
        .map_err(|e| e.to_string())?;

    serde_json::from_str(&response_line).map_err(|e| format!("Invalid response: {}", e))
}

fn parse_args(args: &[String]) -> Result<AdminCommand, String> {
    let arg = |i: usize, what: &str| {
        args.get(i)
            .cloned()
            .ok_or_else(|| format!("{} requires a {} argument", args[1], what))
    };

    match args[1].as_str() {
        "add-user" => {
            let email = arg(2, "email")?;
            let role = match args.get(3) {
                Some(r) => role_name(r)?,
                None => "User".into(),
            };
            let name = args.get(4..).map(|rest| rest.join(" ")).filter(|n| !n.is_empty());
            Ok(AdminCommand::AddUser { name, email, role })
        }
        "set-role" => Ok(AdminCommand::SetRole {
            user_id: arg(2, "user_id")?,
            role: role_name(&arg(3, "role")?)?,
        }),
        "remove-user" => Ok(AdminCommand::RemoveUser {
            user_id: arg(2, "user_id")?,
        }),
        "list-users" => Ok(AdminCommand::ListUsers),
        "ping" => Ok(AdminCommand::Ping),
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }
    if matches!(args[1].as_str(), "-h" | "--help" | "help") {
        print_usage();
        std::process::exit(0);
    }

    let cmd = match parse_args(&args) {
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    match send_command(cmd) {
        Ok(response) => match response {
            AdminResponse::Ok { message } => {
                println!("{}", message);
            }
            AdminResponse::Error { error } => {
                eprintln!("Error: {}", error);
                std::process::exit(1);
            }
            AdminResponse::List { items } => {
                if items.is_empty() {
                    println!("(none)");
                } else {
                    for item in items {
                        println!("{}", item);
                    }
                }
            }
            AdminResponse::Pong => {
                println!("pong - expedicao-node is running");
            }
        },
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
