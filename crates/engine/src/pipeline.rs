//! Pipeline primitives
//!
//! A small named-step runner used for assembly variants and custom pipeline
//! compositions. Steps execute in order, share a key/value context, and the
//! first error stops the run.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use weave_common::errors::{Error, Result};

/// Accumulated state carried through pipeline steps.
#[derive(Debug, Default)]
pub struct StepContext {
    values: HashMap<String, Value>,
    step_name: String,
}

impl StepContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under a key.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Retrieve a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Name of the currently executing step.
    pub fn step_name(&self) -> &str {
        &self.step_name
    }

    /// All keys stored in the context.
    pub fn keys(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }
}

/// A single unit of work in a pipeline.
#[async_trait]
pub trait Step: Send + Sync {
    /// Human-readable name, used in error annotations and the step context.
    fn name(&self) -> &str;

    /// Execute the step, reading from and writing to the context.
    async fn run(&self, ctx: &mut StepContext) -> Result<()>;
}

/// An ordered sequence of steps executed in series.
pub struct Pipeline {
    name: String,
    steps: Vec<Box<dyn Step>>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Add a step to the end of the pipeline.
    pub fn append(&mut self, step: Box<dyn Step>) {
        self.steps.push(step);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Execute all steps in order. The first failing step stops the run and
    /// its error is annotated with the pipeline and step names.
    pub async fn run(&self, ctx: &mut StepContext) -> Result<()> {
        for step in &self.steps {
            ctx.step_name = step.name().to_string();
            if let Err(err) = step.run(ctx).await {
                return Err(Error::Internal {
                    message: format!("pipeline {}: step {}: {err}", self.name, step.name()),
                });
            }
        }
        Ok(())
    }
}
