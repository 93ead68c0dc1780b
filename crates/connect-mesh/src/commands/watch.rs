//! `watch`: run the polling engine for one network and print snapshots.
//!
//! The terminal plays the host: renames and new devices are reported on
//! stderr, a rejected token ends the session with an auth error.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Local;
use futures_util::StreamExt;
use tokio::sync::Notify;
use tracing::info;

use connect_mesh_core::{
    CoreError, Device, EntityRequest, MeshApi, MeshHost, NetworkSession, PollOutcome,
    PollSnapshot, SessionConfig,
};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

// ── Terminal host ───────────────────────────────────────────────────

#[derive(Default)]
struct TerminalHost {
    entities: Mutex<HashSet<String>>,
    reauth: Notify,
    color: bool,
}

impl TerminalHost {
    fn new(color: bool) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// Mark the entities of already-known devices as existing.
    fn seed(&self, devices: &[Arc<Device>]) {
        let mut entities = self.entities.lock().unwrap_or_else(PoisonError::into_inner);
        for device in devices {
            entities.extend(EntityRequest::for_device(device).into_iter().map(|r| r.unique_id));
        }
    }
}

impl MeshHost for TerminalHost {
    async fn rename_device(&self, device: &Device, new_name: &str) -> Result<(), CoreError> {
        eprintln!("{} renamed to {new_name}", device.name());
        Ok(())
    }

    async fn entity_exists(&self, unique_id: &str) -> bool {
        self.entities
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(unique_id)
    }

    async fn create_entity(&self, request: EntityRequest) -> Result<(), CoreError> {
        self.entities
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(request.unique_id.clone());
        // Every device gets exactly one `_last_update` entity.
        if request.unique_id == format!("{}_last_update", request.device.id()) {
            output::print_success(
                &format!(
                    "new device {} ({})",
                    request.device.name(),
                    request.device.device_type()
                ),
                self.color,
                false,
            );
        }
        info!(unique_id = %request.unique_id, kind = %request.kind, "entity registered");
        Ok(())
    }

    async fn request_reauth(&self) {
        self.reauth.notify_one();
    }
}

// ── Rendering ───────────────────────────────────────────────────────

fn line(snapshot: &PollSnapshot, name: &str, color: bool) -> String {
    let mut parts = vec![
        Local::now().format("%H:%M:%S").to_string(),
        name.to_owned(),
        output::availability_label(snapshot.is_available(), color),
    ];
    if let Some(status) = snapshot.status {
        parts.push(format!("power={}", output::power_label(status.power, color)));
        if let Some(b) = status.brightness() {
            parts.push(format!("brightness={b}"));
        }
        if let Some(k) = status.temperature_kelvin() {
            parts.push(format!("temperature={k}K"));
        }
    }
    if let PollOutcome::Failed { ref error, .. } = snapshot.outcome {
        parts.push(format!("error={error}"));
    }
    parts.join("  ")
}

/// Same outcome and status as last time; timestamps alone don't count.
fn unchanged(previous: Option<&PollSnapshot>, current: &PollSnapshot) -> bool {
    previous.is_some_and(|p| p.outcome == current.outcome && p.status == current.status)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    api: MeshApi,
    config: SessionConfig,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    let host = Arc::new(TerminalHost::new(color));
    let session = NetworkSession::connect(api, Arc::clone(&host), config).await?;
    host.seed(&session.registry().devices());

    if !global.quiet {
        eprintln!(
            "Watching {} devices on {} every {}s (Ctrl-C to stop)",
            session.coordinators().len(),
            session.config().network_id,
            session.config().scan_interval.as_secs()
        );
    }

    session.start();
    let mut snapshots = session.snapshots();
    let mut last: HashMap<String, PollSnapshot> = HashMap::new();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let result = loop {
        tokio::select! {
            _ = &mut ctrl_c => break Ok(()),
            () = host.reauth.notified() => {
                break Err(CliError::AuthFailed {
                    message: "the API token was rejected while watching".into(),
                });
            }
            next = snapshots.next() => {
                let Some(snapshot) = next else { break Ok(()) };
                if snapshot.outcome == PollOutcome::Pending {
                    continue;
                }
                if !args.all && unchanged(last.get(&snapshot.device_id), &snapshot) {
                    continue;
                }
                print_snapshot(&session, &snapshot, global, color)?;
                last.insert(snapshot.device_id.clone(), snapshot);
            }
        }
    };

    session.shutdown().await;
    result
}

fn print_snapshot(
    session: &NetworkSession<TerminalHost>,
    snapshot: &PollSnapshot,
    global: &GlobalOpts,
    color: bool,
) -> Result<(), CliError> {
    let out = match global.output {
        OutputFormat::Table => {
            let name = session
                .registry()
                .get(&snapshot.device_id)
                .map_or_else(|| snapshot.device_id.clone(), |d| d.name().to_owned());
            line(snapshot, &name, color)
        }
        // One document per line so the stream stays parseable.
        OutputFormat::Json | OutputFormat::JsonCompact => serde_json::to_string(snapshot)?,
        OutputFormat::Yaml => format!("---\n{}", serde_yaml::to_string(snapshot)?),
        OutputFormat::Plain => format!(
            "{} {}",
            snapshot.device_id,
            output::availability_label(snapshot.is_available(), false)
        ),
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
