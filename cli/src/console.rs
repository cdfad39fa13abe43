//! Line-based console for driving one engine instance.
//!
//! Not a network transport: a local command loop that exercises the same
//! surface a transport adapter would, including authentication for admin
//! commands and rate limiting for proposals and votes.

use anyhow::Result;
use squad_application::{
    AuthGate, AuthIdentity, OrchestrationEngine, RateLimiter, Role,
};
use squad_domain::{
    EngineError, MemberId, ProposalId, SenderKind, SquadId, SquadSettingsUpdate, VoteChoice,
};
use squad_infrastructure::{FixedWindowRateLimiter, StaticAuthGate};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
commands:
  create <squad-name> <member-name> <model>   create a squad; prints id and admin token
  join <squad-id> <name> <model>              enroll a member pair
  leave <squad-id> <name>                     deactivate a member
  kick <squad-id> <token> <member-id>         remove a member (admin token)
  members <squad-id>                          list active members
  say <squad-id> <name> <text...>             post a message
  log <squad-id>                              show the channel
  propose <squad-id> <name> <text...>         open a commit proposal
  vote <squad-id> <name> <proposal-id> <approve|reject|abstain> [human]
  pending <squad-id>                          list open proposals
  context <squad-id>                          show the canonical context
  settings <squad-id> <token> <json>          update squad settings (admin token)
  status <squad-id>                           squad snapshot
  quit";

/// Interactive driver owning the auth gate and rate limiter the real
/// transport boundary would own.
pub struct Console {
    engine: Arc<OrchestrationEngine>,
    gate: StaticAuthGate,
    limiter: FixedWindowRateLimiter,
}

impl Console {
    pub fn new(engine: Arc<OrchestrationEngine>, limiter: FixedWindowRateLimiter) -> Self {
        Self {
            engine,
            gate: StaticAuthGate::new(),
            limiter,
        }
    }

    /// Reads commands from stdin until EOF or `quit`.
    pub async fn run(&self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("squad-orchestrator console (type 'help' for commands)");

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "quit" || line == "exit" {
                break;
            }
            match self.dispatch(line).await {
                Ok(output) => println!("{output}"),
                Err(err) => println!("error: {err}"),
            }
        }
        Ok(())
    }

    async fn dispatch(&self, line: &str) -> Result<String, EngineError> {
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        match command {
            "help" => Ok(HELP.to_string()),
            "create" => self.create(&args).await,
            "join" => {
                let [squad, name, model] = take::<3>(&args)?;
                let outcome = self.engine.join(&SquadId::new(squad), name, model)?;
                Ok(format!("joined: {} ({})", outcome.member.name, outcome.member.id))
            }
            "leave" => {
                let [squad, name] = take::<2>(&args)?;
                let member = self.engine.leave(&SquadId::new(squad), name)?;
                Ok(format!("left: {} ({})", member.name, member.id))
            }
            "kick" => {
                let [squad, token, member_id] = take::<3>(&args)?;
                let squad_id = SquadId::new(squad);
                let identity = self.authenticate(token).await?;
                let member = self
                    .engine
                    .kick_member(&squad_id, &identity, &MemberId::new(member_id))
                    .await?;
                Ok(format!("kicked: {}", member.name))
            }
            "members" => {
                let [squad] = take::<1>(&args)?;
                let members = self.engine.list_members(&SquadId::new(squad))?;
                Ok(members
                    .iter()
                    .map(|m| format!("{} ({}, {})", m.name, m.id, m.model))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            "say" => {
                let (fixed, rest) = take_rest::<2>(&args)?;
                let [squad, name] = fixed;
                let message = self.engine.send_message(
                    &SquadId::new(squad),
                    name,
                    SenderKind::Human,
                    &rest,
                    None,
                )?;
                Ok(format!("sent {}", message.id))
            }
            "log" => {
                let [squad] = take::<1>(&args)?;
                let messages = self.engine.read_messages(&SquadId::new(squad), None, None)?;
                Ok(messages
                    .iter()
                    .map(|m| format!("[{}] {}: {}", m.timestamp.format("%H:%M:%S"), m.sender_name, m.content))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            "propose" => {
                let (fixed, rest) = take_rest::<2>(&args)?;
                let [squad, name] = fixed;
                if !self.limiter.check_and_consume("propose", name).await {
                    return Ok("throttled: too many proposals, slow down".to_string());
                }
                let proposal = self
                    .engine
                    .propose_commit(&SquadId::new(squad), name, &rest)?;
                Ok(format!("proposal {} opened ({})", proposal.id, proposal.consensus_mode))
            }
            "vote" => {
                if args.len() < 4 {
                    return Err(usage());
                }
                let (squad, name, proposal, choice) = (args[0], args[1], args[2], args[3]);
                let human = args.get(4) == Some(&"human");
                if !self.limiter.check_and_consume("vote", name).await {
                    return Ok("throttled: too many votes, slow down".to_string());
                }
                let outcome = self.engine.vote(
                    &SquadId::new(squad),
                    name,
                    &ProposalId::new(proposal),
                    choice.parse::<VoteChoice>()?,
                    human,
                )?;
                Ok(format!(
                    "recorded {}: {}",
                    outcome.vote.choice,
                    outcome.decision.describe()
                ))
            }
            "pending" => {
                let [squad] = take::<1>(&args)?;
                let pending = self.engine.list_pending_commits(&SquadId::new(squad))?;
                if pending.is_empty() {
                    return Ok("no pending proposals".to_string());
                }
                Ok(pending
                    .iter()
                    .map(|p| {
                        format!(
                            "{}: \"{}\" [{}]",
                            p.proposal.id, p.proposal.content, p.progress
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            "context" => {
                let [squad] = take::<1>(&args)?;
                let context = self.engine.get_context(&SquadId::new(squad))?;
                if context.entries.is_empty() {
                    return Ok("context is empty".to_string());
                }
                Ok(context.summary)
            }
            "settings" => {
                let (fixed, rest) = take_rest::<2>(&args)?;
                let [squad, token] = fixed;
                let squad_id = SquadId::new(squad);
                let identity = self.authenticate(token).await?;
                let update: SquadSettingsUpdate = serde_json::from_str(&rest)
                    .map_err(|e| EngineError::InvalidArgument(e.to_string()))?;
                let changed = self
                    .engine
                    .update_squad_settings(&squad_id, &identity, update)
                    .await?;
                Ok(format!("updated: {}", changed.join(", ")))
            }
            "status" => {
                let [squad] = take::<1>(&args)?;
                let status = self.engine.get_status(&SquadId::new(squad))?;
                Ok(format!(
                    "{}: mode {}, {} members, {} messages, context v{}, {} pending",
                    status.name,
                    status.consensus_mode,
                    status.active_members.len(),
                    status.message_count,
                    status.context_version,
                    status.pending_proposals,
                ))
            }
            other => Err(EngineError::InvalidArgument(format!(
                "unknown command '{other}' (try 'help')"
            ))),
        }
    }

    async fn create(&self, args: &[&str]) -> Result<String, EngineError> {
        let [squad_name, member_name, model] = take::<3>(args)?;
        let created = self
            .engine
            .create_squad(squad_name, member_name, model)
            .await?;

        // Hand the creator an admin token for kick/settings commands.
        let token = format!("admin-{}", created.creator.id);
        self.gate.register(
            token.clone(),
            AuthIdentity::new(
                created.squad.id.clone(),
                created.creator.id.clone(),
                Role::Admin,
            ),
        );
        Ok(format!(
            "squad {} created ({})\nadmin token: {token}",
            created.squad.id, created.squad.name
        ))
    }

    async fn authenticate(&self, token: &str) -> Result<AuthIdentity, EngineError> {
        self.gate
            .authenticate(token)
            .await
            .map_err(|_| EngineError::AdminRequired)
    }
}

fn usage() -> EngineError {
    EngineError::InvalidArgument("wrong number of arguments (try 'help')".into())
}

/// Exactly N positional arguments.
fn take<'a, const N: usize>(args: &[&'a str]) -> Result<[&'a str; N], EngineError> {
    if args.len() != N {
        return Err(usage());
    }
    let mut out = [""; N];
    out.copy_from_slice(&args[..N]);
    Ok(out)
}

/// N positional arguments followed by free text.
fn take_rest<'a, const N: usize>(args: &[&'a str]) -> Result<([&'a str; N], String), EngineError> {
    if args.len() <= N {
        return Err(usage());
    }
    let mut out = [""; N];
    out.copy_from_slice(&args[..N]);
    Ok((out, args[N..].join(" ")))
}
