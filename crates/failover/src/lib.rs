// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Endpoint discovery for high-availability services
//!
//! Two routines, composed by callers:
//!
//! - [`find_active`] walks an ordered list of metadata endpoints (for
//!   example an HDFS NameNode pair) and returns the first one whose probe
//!   succeeds.
//! - [`select_working_host`] draws hosts at random from a pool of
//!   interchangeable workers (for example Impala daemons on the DataNodes),
//!   removing every host whose connect attempt fails, until one yields a
//!   session.
//!
//! Both are synchronous. Each attempt blocks for as long as the supplied
//! closure does, so per-attempt timeouts belong to the closure. Individual
//! attempt failures are logged and absorbed; the caller sees either a
//! result or exactly one [`FailoverError`] once every candidate is spent.

mod error;

pub use error::{Attempt, Attempts, FailoverError};

use diagnostics::*;
use rand::Rng;
use std::fmt::Display;

pub type Result<T> = std::result::Result<T, FailoverError>;

/// Return the first endpoint, in order, whose `probe` succeeds.
///
/// The input is never modified. An empty list fails with
/// [`FailoverError::NoActiveEndpoint`] without calling `probe`.
pub fn find_active<'a, T, E, P>(endpoints: &'a [T], mut probe: P) -> Result<&'a T>
where
    T: Display,
    E: Display,
    P: FnMut(&T) -> std::result::Result<(), E>,
{
    let mut attempts = Attempts::default();

    for endpoint in endpoints {
        let candidate = endpoint.to_string();
        debug!("Probing endpoint {candidate}", candidate);

        match probe(endpoint) {
            Ok(()) => {
                info!("Active endpoint is {candidate}", candidate);
                return Ok(endpoint);
            }
            Err(e) => {
                let reason = e.to_string();
                warn!("Endpoint {candidate} is not active: {reason}", candidate, reason);
                attempts.push(candidate, reason);
            }
        }
    }

    Err(FailoverError::NoActiveEndpoint { attempts })
}

/// Draw hosts uniformly at random until `connect` yields a session.
///
/// See [`select_working_host_with`]; this uses the thread-local RNG.
pub fn select_working_host<T, S, E, C>(hosts: &mut Vec<T>, connect: C) -> Result<S>
where
    T: Display,
    E: Display,
    C: FnMut(&T) -> std::result::Result<S, E>,
{
    select_working_host_with(hosts, &mut rand::thread_rng(), connect)
}

/// Draw hosts from `hosts` using `rng` until `connect` yields a session.
///
/// `connect` is expected to build the session and run its own sanity
/// check; any `Err` counts as a failed host. A failed host is removed from
/// `hosts` before the next draw, so each host is tried at most once and the
/// pool shrinks by one per failure. When the pool runs dry the result is
/// [`FailoverError::NoAvailableHost`] and `hosts` is left empty.
///
/// On success only the hosts that failed before the winner are gone; the
/// winner and any host never drawn are still in `hosts`.
///
/// Whatever `connect` acquired on its failure path is released by the time
/// it returns `Err`; a session that fails a later check inside `connect` is
/// dropped there.
pub fn select_working_host_with<T, S, E, C, R>(
    hosts: &mut Vec<T>,
    rng: &mut R,
    mut connect: C,
) -> Result<S>
where
    T: Display,
    E: Display,
    C: FnMut(&T) -> std::result::Result<S, E>,
    R: Rng + ?Sized,
{
    let mut attempts = Attempts::default();

    while !hosts.is_empty() {
        let index = rng.gen_range(0..hosts.len());
        let candidate = hosts[index].to_string();
        let remaining = hosts.len();
        debug!("Trying host {candidate} ({remaining} candidates left)", candidate, remaining);

        match connect(&hosts[index]) {
            Ok(session) => {
                info!("Selected host {candidate}", candidate);
                return Ok(session);
            }
            Err(e) => {
                let reason = e.to_string();
                warn!("Host {candidate} is unavailable: {reason}", candidate, reason);
                // Pool order carries no meaning
                hosts.swap_remove(index);
                attempts.push(candidate, reason);
            }
        }
    }

    Err(FailoverError::NoAvailableHost { attempts })
}
