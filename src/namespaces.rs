use std::collections::HashMap;

use log::debug;

use crate::constants::CHIA_NAMESPACE;
use crate::error::{Error, Result};
use crate::types::{CHIA_EVENTS, ChiaMethod, Namespace};

/// Namespace prefixes of the given CAIP-2 chain ids, first-seen order
pub fn namespaces_from_chains<S: AsRef<str>>(chains: &[S]) -> Vec<String> {
    let mut namespaces: Vec<String> = vec![];
    for chain in chains {
        let namespace = chain.as_ref().split(':').next().unwrap_or_default();
        if !namespaces.iter().any(|n| n == namespace) {
            namespaces.push(namespace.to_string());
        }
    }
    namespaces
}

pub fn supported_methods_by_namespace(namespace: &str) -> Result<Vec<String>> {
    match namespace {
        CHIA_NAMESPACE => Ok(ChiaMethod::names()),
        _ => Err(Error::NoDefaultMethods(namespace.to_string())),
    }
}

pub fn supported_events_by_namespace(namespace: &str) -> Result<Vec<String>> {
    match namespace {
        CHIA_NAMESPACE => Ok(CHIA_EVENTS.iter().map(|e| e.to_string()).collect()),
        _ => Err(Error::NoDefaultEvents(namespace.to_string())),
    }
}

/// Namespaces requested in a session proposal.
///
/// Only the `chia` namespace is ever requested; chains from other namespaces
/// are dropped.
pub fn required_namespaces<S: AsRef<str>>(
    chains: &[S],
) -> Result<HashMap<String, Namespace>> {
    let selected = [CHIA_NAMESPACE];
    debug!("selected namespaces: {selected:?}");

    selected
        .iter()
        .map(|namespace| -> Result<(String, Namespace)> {
            Ok((
                namespace.to_string(),
                Namespace {
                    accounts: None,
                    chains: chains
                        .iter()
                        .map(|c| c.as_ref())
                        .filter(|c| c.starts_with(namespace))
                        .map(str::to_string)
                        .collect(),
                    events: supported_events_by_namespace(namespace)?,
                    methods: supported_methods_by_namespace(namespace)?,
                },
            ))
        })
        .collect()
}
