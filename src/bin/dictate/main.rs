//! The dictation front-end.
//!
//! One binary covers every presentation style the tool supports: verbose
//! diagnostics by default, `--silent` for scripting, `--output` for file
//! delivery. Recording runs on a worker thread; this thread waits for the
//! session result while watching for Enter and SIGINT/SIGTERM, both of which
//! request a manual stop (the session still transcribes what it captured).

use clap::Parser;
use dictate::audio::Recorder;
use dictate::backend::{SttBackend, WhisperApiBackend};
use dictate::config::AppConfig;
use dictate::{logging, output, start_session, SessionMessage};
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;
use tracing::{debug, error, info};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

fn main() -> ExitCode {
    let args = AppConfig::parse();
    logging::init(args.debug, args.silent);

    if args.list_input_devices {
        return list_input_devices();
    }

    let settings = match args.resolve() {
        Ok(settings) => settings,
        Err(err) => {
            error!("invalid configuration: {err:#}");
            return ExitCode::from(2);
        }
    };

    let backend = match WhisperApiBackend::new(settings.backend.clone()) {
        Ok(backend) => backend,
        Err(err) => {
            error!("{err:#}");
            return ExitCode::from(1);
        }
    };
    if !backend.is_available() {
        error!(
            "transcription backend unavailable: no API key found in config, \
             OPENAI_API_KEY, or {}",
            args.env_file.display()
        );
        return ExitCode::from(1);
    }

    let recorder = match Recorder::new(settings.session.input_device.as_deref()) {
        Ok(recorder) => recorder,
        Err(err) => {
            error!("audio capture unavailable: {err:#}");
            return ExitCode::from(1);
        }
    };

    install_signal_handlers();
    info!("recording from '{}'; speak now", recorder.device_name());
    if settings.session.vad_enabled {
        info!(
            "will stop after {:.1}s of silence (press Enter or Ctrl-C to stop early)",
            settings.session.silence_duration.as_secs_f32()
        );
    }

    let job = start_session(recorder, Box::new(backend), settings.session.clone());

    // Enter stops the session when running interactively. Skipped for piped
    // stdin so batch invocations are not cut short by an immediate EOF.
    if std::io::stdin().is_terminal() {
        let stop = job.stop_handle();
        std::thread::spawn(move || {
            let mut line = String::new();
            if std::io::stdin().read_line(&mut line).is_ok() {
                stop.store(true, Ordering::Relaxed);
            }
        });
    }

    let message = loop {
        match job.receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(message) => break message,
            Err(RecvTimeoutError::Timeout) => {
                if INTERRUPTED.load(Ordering::Relaxed) {
                    job.request_stop();
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                error!("session worker exited unexpectedly");
                return ExitCode::from(1);
            }
        }
    };

    match message {
        SessionMessage::Transcript { text, stats } => {
            debug!("session ended: {}", stats.stop_reason.label());
            let mut adapter = output::from_config(&settings.delivery);
            if let Err(err) = adapter.deliver(&text) {
                error!("failed to deliver transcription: {err:#}");
                return ExitCode::from(1);
            }
            if let Some(path) = &settings.delivery.output {
                info!("transcription saved to {}", path.display());
            }
            ExitCode::SUCCESS
        }
        SessionMessage::Failed { error: failure, .. } => {
            error!("{failure}");
            ExitCode::from(1)
        }
    }
}

fn list_input_devices() -> ExitCode {
    match Recorder::list_devices() {
        Ok(names) => {
            if names.is_empty() {
                println!("No audio input devices detected.");
            }
            for name in names {
                println!("{name}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("failed to list audio input devices: {err:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(unix)]
fn install_signal_handlers() {
    let handler = handle_signal as extern "C" fn(libc::c_int);
    // SAFETY: the handler only stores to an AtomicBool, which is
    // async-signal-safe.
    unsafe {
        libc::signal(libc::SIGINT, handler as libc::sighandler_t);
        libc::signal(libc::SIGTERM, handler as libc::sighandler_t);
    }
}

#[cfg(unix)]
extern "C" fn handle_signal(_signum: libc::c_int) {
    INTERRUPTED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_signal_handlers() {}
