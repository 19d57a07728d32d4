use std::error::Error;
use std::{env, fs, process};

use ctxfeat::{ContextFeatures, CtxfeatConfig, FeatureRequest, LoggingConfig, featurize_batch};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(cfg: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cfg.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let Some(request_path) = args.next() else {
        eprintln!("usage: ctxfeat <request.json> [config.yaml]");
        process::exit(2);
    };

    let config = match args.next() {
        Some(path) => CtxfeatConfig::from_file(path)?,
        None => CtxfeatConfig::default(),
    };
    init_tracing(&config.logging);

    let featurizer = config.build_featurizer()?;
    let request = FeatureRequest::from_json(&fs::read_to_string(&request_path)?)?;
    info!(
        request = %request_path,
        utterances = request.utterances.len(),
        lexicon_len = request.lexicon.len(),
        parallel = featurizer.config().use_parallel,
        "featurizing request"
    );

    let features = featurize_batch(&featurizer, &request.utterances, &request.lexicon)?;
    let values: Vec<Vec<f32>> = features
        .into_iter()
        .map(ContextFeatures::into_values)
        .collect();
    println!("{}", serde_json::to_string(&values)?);

    Ok(())
}
