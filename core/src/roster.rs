//! Utøverstall og tilstandsendringer som eksplisitte kommandoer.
//!
//! Bekreftelse hentes av kalleren (dialog, CLI, test) og sendes inn som
//! [`Decision`]; denne modulen spør aldri selv.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Athlete {
    pub id: String,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Athlete {
    pub fn new(id: &str, name: &str) -> Self {
        Self { id: id.to_string(), name: name.to_string(), active: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Confirmed,
    Declined,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RosterCommand {
    Deactivate { athlete_id: String, decision: Decision },
    Reactivate { athlete_id: String, decision: Decision },
    Remove { athlete_id: String, decision: Decision },
}

impl RosterCommand {
    fn parts(&self) -> (&str, Decision) {
        match self {
            RosterCommand::Deactivate { athlete_id, decision }
            | RosterCommand::Reactivate { athlete_id, decision }
            | RosterCommand::Remove { athlete_id, decision } => (athlete_id.as_str(), *decision),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandOutcome {
    Applied,
    Declined,
    NotFound,
    /// Utøveren var allerede i måltilstanden
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Roster {
    athletes: Vec<Athlete>,
}

impl Roster {
    pub fn new(athletes: Vec<Athlete>) -> Self {
        Self { athletes }
    }

    pub fn all(&self) -> &[Athlete] {
        &self.athletes
    }

    pub fn get(&self, id: &str) -> Option<&Athlete> {
        self.athletes.iter().find(|a| a.id == id)
    }

    /// Aktive utøvere i stallens rekkefølge (input til kohortaggregatet).
    pub fn active_athletes(&self) -> Vec<Athlete> {
        self.athletes.iter().filter(|a| a.active).cloned().collect()
    }

    pub fn apply(&mut self, cmd: &RosterCommand) -> CommandOutcome {
        let (id, decision) = cmd.parts();
        let Some(idx) = self.athletes.iter().position(|a| a.id == id) else {
            return CommandOutcome::NotFound;
        };
        if decision == Decision::Declined {
            log::debug!("roster command declined for {id}");
            return CommandOutcome::Declined;
        }

        let outcome = match cmd {
            RosterCommand::Deactivate { .. } => self.set_active(idx, false),
            RosterCommand::Reactivate { .. } => self.set_active(idx, true),
            RosterCommand::Remove { .. } => {
                self.athletes.remove(idx);
                CommandOutcome::Applied
            }
        };
        log::info!("roster command {cmd:?} -> {outcome:?}");
        outcome
    }

    fn set_active(&mut self, idx: usize, active: bool) -> CommandOutcome {
        let a = &mut self.athletes[idx];
        if a.active == active {
            return CommandOutcome::Unchanged;
        }
        a.active = active;
        CommandOutcome::Applied
    }
}
