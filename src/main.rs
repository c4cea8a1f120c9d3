use std::io;

use vt100_logger::vt_logger::level_from_env;
use vt100_logger::{
    init_log_bridge, init_thread_safety, log_debug, log_info, log_trace, log_warn, set_level,
};

fn main() -> io::Result<()> {
    let configured =
        level_from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    if let Some(level) = configured {
        set_level(level);
    }
    init_thread_safety();

    log_trace!("trace is shown only with VT100_LOG_LEVEL=trace");
    log_debug!("debug: counter=%u", 3u32);
    log_info!("mask=%b flags=0x%X", 42u32, 0x2Au32);
    log_info!("id=%p name=%s", 0xAB as *const u8, "sensor");
    log_warn!("temp=%d", 87);

    if init_log_bridge().is_ok() {
        log::warn!("routed through the log facade: {}", "ok");
    }
    Ok(())
}
