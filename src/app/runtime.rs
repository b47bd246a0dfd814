use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use chemly_core::tokenize;
use tracing::{debug, info, warn};

use crate::app::resolution_orchestrator::ResolutionSession;
use crate::app::{
    config_manager, config_runtime, exit_handler, input_processor, structure_export, terminal,
};
use crate::{ProcessExit, output};

pub(crate) async fn run_chemly() -> Result<ProcessExit> {
    let (args, cli_sources) = config_runtime::parse_cli_with_sources();
    let resolved = config_manager::resolve_config(args, &cli_sources)?;
    let args = resolved.args;

    let default_level = config_runtime::resolve_default_log_level(&args);
    let force_cli_log_level = config_runtime::should_force_cli_log_level(&cli_sources);
    let terminal_profile = terminal::TerminalProfile::detect();
    terminal::init_tracing(
        default_level,
        force_cli_log_level,
        terminal_profile.use_color(args.no_color),
    );

    debug!(
        ?args,
        connect_timeout_secs = resolved.http_timeouts.connect_secs,
        read_timeout_secs = resolved.http_timeouts.read_secs,
        config_file = resolved.loaded_from_file,
        "configuration resolved"
    );
    info!("Chemly starting");

    let collected = input_processor::process_input(&args.inputs)?;
    let Some(input_text) = collected.text else {
        output::print_quick_start_guidance(collected.piped_stdin_was_empty);
        return Ok(ProcessExit::Success);
    };

    let input = tokenize(&input_text);
    output::log_parse_feedback(&input);

    let session = ResolutionSession::from_args(&args)?;

    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_signal = Arc::clone(&interrupted);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupted_signal.store(true, Ordering::SeqCst);
        }
    });

    let show_progress = terminal_profile.show_progress(args.quiet);
    let result = session
        .run(input, Arc::clone(&interrupted), show_progress)
        .await?;

    output::log_run_summary(&result);
    let rendered = output::render_result(&result, args.format)?;
    output::write_output(&rendered, args.output.as_deref())?;

    if let Some(dir) = &args.structures
        && !result.records().is_empty()
        && !result.was_interrupted()
    {
        let selected = structure_export::select_records(result.records(), &args.structures_for);
        if !selected.is_empty() {
            structure_export::export_structures(
                &session.structure_fetcher(),
                &selected,
                dir,
                &interrupted,
            )
            .await?;
        }
    }

    if result.was_interrupted() || interrupted.load(Ordering::SeqCst) {
        warn!(
            completed = result.completed_count(),
            total = result.total_count(),
            "Run interrupted before completion"
        );
        return Ok(ProcessExit::Failure);
    }

    Ok(exit_handler::determine_exit_outcome(
        result.records().len(),
        result.failed().len(),
    ))
}
