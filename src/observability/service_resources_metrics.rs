use crate::observability::metrics::{get_metrics, Metrics};
use anyhow::Result;
use std::time::Duration;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use tokio::time::sleep;

use crate::helpers::time::now_i64;

const SAMPLE_INTERVAL: Duration = Duration::from_secs(5);

/// Periodically sample this process's resource usage into the registry.
pub async fn collect_process_metrics(is_metrics_enabled: bool) -> Result<()> {
    if !is_metrics_enabled {
        return Ok(());
    }
    let metrics = get_metrics().await;
    let mut sys = System::new_all();
    let pid = sysinfo::get_current_pid().unwrap();

    let start_time_unix = now_i64();
    metrics.process_start_time.set(start_time_unix);

    loop {
        sample_process(&mut sys, pid, metrics, start_time_unix);
        sleep(SAMPLE_INTERVAL).await;
    }
}

fn sample_process(sys: &mut System, pid: Pid, metrics: &Metrics, start_time_unix: i64) {
    // Refresh just our process
    let pids = [pid];
    sys.refresh_processes_specifics(
        ProcessesToUpdate::Some(&pids),
        false,
        ProcessRefreshKind::nothing()
            .with_cpu()
            .with_memory()
            .with_exe(UpdateKind::OnlyIfNotSet),
    );

    let Some(proc) = sys.process(pid) else {
        return;
    };

    metrics.process_cpu_usage.set(proc.cpu_usage().into());
    metrics.process_memory_usage.set(proc.memory() as i64);

    #[cfg(target_family = "unix")]
    {
        if let Ok(entries) = std::fs::read_dir(format!("/proc/{}/fd", pid.as_u32())) {
            metrics.process_open_fds.set(entries.count() as i64);
        }
    }

    metrics.process_uptime.set(now_i64() - start_time_unix);
}
