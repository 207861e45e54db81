use clap::Parser;
use hippo_volume::{
    Cleanup, DelayedRemoval, Pipeline, PipelineConfig, ReportComposer, StoreScuTransport,
    ThresholdModel, Transport, cli::Cli, finish,
};
use log::{error, info};
use std::process;
use std::time::Duration;

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let composer = match &cli.font {
        Some(path) => match ReportComposer::with_font_path(path) {
            Ok(composer) => composer,
            Err(e) => {
                error!("{e}");
                process::exit(1);
            }
        },
        None => ReportComposer::with_system_font(),
    };

    let config = PipelineConfig {
        series_description: cli.series_description.clone(),
        output_path: cli.output.clone(),
        resize_policy: cli.resize_policy.clone().into(),
        preview_path: cli.preview.clone(),
    };
    let model = ThresholdModel::new((cli.patch_size, cli.patch_size));
    let pipeline = Pipeline::new(config, model, composer);

    info!("Looking for series to run inference on in {}", cli.routing_dir.display());
    let outcome = match pipeline.run(&cli.routing_dir) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    let transport = StoreScuTransport {
        program: cli.storescu.clone(),
        host: cli.host.clone(),
        port: cli.port,
        called_ae_title: cli.aec.clone(),
    };
    let cleanup = DelayedRemoval {
        delay: Duration::from_secs(cli.cleanup_delay_secs),
    };
    finish(
        &outcome,
        (!cli.no_transport).then_some(&transport as &dyn Transport),
        (!cli.keep_study).then_some(&cleanup as &dyn Cleanup),
    );

    info!(
        "Inference successful on {}, out: {:?}, {}",
        outcome.source_sop_instance_uid, outcome.label_shape, outcome.statistics
    );
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}
