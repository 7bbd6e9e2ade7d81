// Command-line front end: argument model, validation and dispatch.
//
// Every subcommand maps onto exactly one `NacClient` call. Validation runs
// before the client is touched so a usage error never reaches the network.

use std::fmt;
use std::net::Ipv4Addr;

use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::api::{ClientConfig, NacClient, UserFilter, UserState, DEFAULT_BASE_URL};
use crate::error::{Error, Result};
use crate::mac::validate_mac_address;

const MISSING_CREDENTIALS: &str = "Username and password are mandatory parameters.";

#[derive(Parser, Debug)]
#[command(
    name = "nac-cli",
    version,
    about = "Query and update a Tallac NAC server",
    long_about = None
)]
pub struct Cli {
    /// Base URL of the NAC REST service.
    #[arg(long, global = true, env = "NAC_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Value sent as `ip` in user updates.
    #[arg(long, global = true, env = "NAC_CHANGE_USER_IP", default_value_t = 0)]
    pub change_user_ip: i64,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url.clone()).with_change_user_ip(self.change_user_ip)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Get NAC users
    #[command(name = "getUsers")]
    GetUsers {
        /// Get users with specified MAC Address
        #[arg(long)]
        mac: Option<String>,
        /// Get users with specified IPv4 Address
        #[arg(long)]
        ip: Option<Ipv4Addr>,
    },
    /// Modify user data
    #[command(name = "changeUser")]
    ChangeUser {
        /// User's MAC Address
        mac: String,
        /// User state
        #[arg(long, value_enum, ignore_case = true)]
        state: Option<UserState>,
        /// User description
        #[arg(long)]
        details: Option<String>,
    },
    /// Get logs
    #[command(name = "getLogs")]
    GetLogs,
    /// Authenticate as a guest
    #[command(name = "authGuest")]
    AuthGuest {
        /// Guest IP address. Defaults to the address the request comes from.
        #[arg(long)]
        ip: Option<Ipv4Addr>,
    },
    /// Authenticate as a client
    #[command(name = "authClient")]
    AuthClient {
        /// Client IP address. Defaults to the address the request comes from.
        #[arg(long)]
        ip: Option<Ipv4Addr>,
        /// User name
        #[arg(long)]
        username: Option<String>,
        /// Password
        #[arg(long)]
        password: Option<String>,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::GetUsers { .. } => "getUsers",
            Command::ChangeUser { .. } => "changeUser",
            Command::GetLogs => "getLogs",
            Command::AuthGuest { .. } => "authGuest",
            Command::AuthClient { .. } => "authClient",
        }
    }

    /// Checks that need more than clap's per-argument parsing.
    pub fn validate(&self) -> Result<()> {
        match self {
            Command::GetUsers { mac, ip } => {
                if let Some(mac) = mac {
                    validate_mac_address(mac)?;
                }
                if mac.is_some() && ip.is_some() {
                    return Err(Error::usage(
                        "MAC and IP addresses cannot be specified at the same time.",
                    ));
                }
            }
            Command::ChangeUser {
                mac,
                state,
                details,
            } => {
                validate_mac_address(mac)?;
                if state.is_none() && details.is_none() {
                    return Err(Error::usage("State or details should be specified."));
                }
            }
            Command::GetLogs | Command::AuthGuest { .. } => {}
            Command::AuthClient {
                username, password, ..
            } => {
                if username.is_none() || password.is_none() {
                    return Err(Error::usage(MISSING_CREDENTIALS));
                }
            }
        }
        Ok(())
    }
}

/// Result of a dispatched command, ready to print.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Json(Value),
    Raw(String),
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Json(value) => match serde_json::to_string_pretty(value) {
                Ok(text) => f.write_str(&text),
                Err(_) => write!(f, "{value}"),
            },
            Output::Raw(body) => f.write_str(body),
        }
    }
}

/// Validate `command` and perform its single REST call.
pub fn run(command: &Command, client: &NacClient) -> Result<Output> {
    command.validate()?;

    let output = match command {
        Command::GetUsers { mac, ip } => {
            let filter = match (mac, ip) {
                (Some(mac), _) => UserFilter::Mac(mac),
                (None, Some(ip)) => UserFilter::Ip(*ip),
                (None, None) => UserFilter::All,
            };
            Output::Json(client.get_users(filter)?)
        }
        Command::ChangeUser {
            mac,
            state,
            details,
        } => Output::Raw(client.change_user(mac, *state, details.as_deref())?),
        Command::GetLogs => Output::Json(client.get_logs()?),
        Command::AuthGuest { ip } => Output::Raw(client.auth_guest(*ip)?),
        Command::AuthClient {
            ip,
            username: Some(username),
            password: Some(password),
        } => Output::Raw(client.auth_client(*ip, username, password)?),
        Command::AuthClient { .. } => return Err(Error::usage(MISSING_CREDENTIALS)),
    };
    Ok(output)
}
