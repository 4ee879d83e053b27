//! Context command implementation
//!
//! Runs the typed entity reads against the configured session.

use super::{connect, report};
use crate::adapters::emr::EmrClient;
use crate::config::load_config;
use crate::domain::{Resource, Result};
use clap::{Args, ValueEnum};

/// Context entity to read
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Patient,
    Encounter,
    Practitioner,
}

impl Entity {
    async fn read(self, client: &EmrClient) -> Result<Resource> {
        match self {
            Entity::Patient => client.get_patient_read().await,
            Entity::Encounter => client.get_encounter_read().await,
            Entity::Practitioner => client.get_practitioner_read().await,
        }
    }
}

/// Arguments for the context command
#[derive(Args, Debug)]
pub struct ContextArgs {
    /// Entity to read; all three when omitted
    #[arg(value_enum)]
    pub entity: Option<Entity>,
}

impl ContextArgs {
    /// Execute the context command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => return Ok(report("Loading configuration", &e)),
        };

        let client = match connect(&config).await {
            Ok(c) => c,
            Err(e) => return Ok(report("Connecting", &e)),
        };

        let entities = match self.entity {
            Some(entity) => vec![entity],
            None => vec![Entity::Patient, Entity::Encounter, Entity::Practitioner],
        };

        for entity in entities {
            match entity.read(&client).await {
                Ok(resource) => println!("{}", serde_json::to_string_pretty(&resource)?),
                Err(e) => return Ok(report(&format!("Reading {entity:?}"), &e)),
            }
        }

        Ok(0)
    }
}
