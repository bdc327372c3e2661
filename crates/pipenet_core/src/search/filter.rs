//! Filter values and predicates over pipes and stations.
//!
//! # Invariants
//! - Name matching is case-insensitive substring search; an empty needle
//!   matches every record.
//! - Stations without workshops never match an unused-percentage filter.

use crate::model::pipe::Pipe;
use crate::model::station::CompressorStation;
use regex::{Regex, RegexBuilder};

/// Case-insensitive substring matcher for record names.
#[derive(Debug, Clone)]
pub enum NameMatcher {
    Pattern(Regex),
    /// Used only when the escaped needle exceeds regex size limits.
    Lowercase(String),
}

impl NameMatcher {
    pub fn new(needle: &str) -> Self {
        match RegexBuilder::new(&regex::escape(needle))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => Self::Pattern(pattern),
            Err(_) => Self::Lowercase(needle.to_lowercase()),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Pattern(pattern) => pattern.is_match(name),
            Self::Lowercase(needle) => name.to_lowercase().contains(needle.as_str()),
        }
    }
}

/// Pipe selection criteria used by search and batch flows.
#[derive(Debug, Clone, PartialEq)]
pub enum PipeFilter {
    NameContains(String),
    RepairStatus(bool),
}

impl PipeFilter {
    /// Builds a reusable predicate for this filter.
    pub fn predicate(&self) -> Box<dyn Fn(&Pipe) -> bool> {
        match self {
            Self::NameContains(needle) => {
                let matcher = NameMatcher::new(needle);
                Box::new(move |pipe: &Pipe| matcher.matches(&pipe.name))
            }
            Self::RepairStatus(status) => {
                let status = *status;
                Box::new(move |pipe: &Pipe| pipe.under_repair == status)
            }
        }
    }
}

/// Station selection criteria used by search and batch flows.
#[derive(Debug, Clone, PartialEq)]
pub enum StationFilter {
    NameContains(String),
    /// Inclusive bounds in percent.
    UnusedPercentage { min: f64, max: f64 },
}

impl StationFilter {
    /// Builds a reusable predicate for this filter.
    pub fn predicate(&self) -> Box<dyn Fn(&CompressorStation) -> bool> {
        match self {
            Self::NameContains(needle) => {
                let matcher = NameMatcher::new(needle);
                Box::new(move |station: &CompressorStation| matcher.matches(&station.name))
            }
            Self::UnusedPercentage { min, max } => {
                let (min, max) = (*min, *max);
                Box::new(move |station: &CompressorStation| {
                    unused_percentage_in_range(station, min, max)
                })
            }
        }
    }
}

/// Inclusive range check on a station's unused-workshop percentage.
pub fn unused_percentage_in_range(station: &CompressorStation, min: f64, max: f64) -> bool {
    station
        .unused_percentage()
        .is_some_and(|unused| min <= unused && unused <= max)
}
