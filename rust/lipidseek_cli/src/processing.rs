use indicatif::{
    ProgressBar,
    ProgressStyle,
};
use std::time::Instant;
use tracing::{
    debug,
    info,
};

use lipidseek::chemistry::{
    AdductCatalogue,
    BuildingBlocks,
};
use lipidseek::data_sources::{
    read_mgf,
    SpectraIndex,
};
use lipidseek::scoring::RunSummary;
use lipidseek::{
    CandidateSpace,
    FragmentMassBuilder,
    ParameterMap,
    Scorer,
    SearchParameters,
    SearchPipeline,
};

use super::config::Config;
use super::errors::CliError;
use super::results;

pub fn run_search(config: &Config, map: &ParameterMap) -> Result<RunSummary, CliError> {
    let spectra_path = config.spectra_path()?;
    let output = config.output_config()?;

    let params = SearchParameters::from_map(map);
    debug!("Search parameters: {:#?}", params);

    let st = Instant::now();
    let spectra = read_mgf(spectra_path)?;
    let index = SpectraIndex::build(&spectra, &params.precursor_tolerance)?;
    info!(
        "Loading {} spectra took {:?} for {}",
        index.len(),
        st.elapsed(),
        spectra_path.display()
    );

    let blocks = BuildingBlocks::from_parameters(map, params.sl_base_length);
    info!(
        "Enabled building blocks: {} head groups, {} backbones",
        blocks.head_groups.len(),
        blocks.backbones.len()
    );
    let adducts = AdductCatalogue::from_parameters(map, params.positive_mode, params.negative_mode);
    if adducts.is_empty() {
        return Err(CliError::Config {
            source: "No adduct is enabled for the selected ionization modes".to_string(),
        });
    }
    info!(
        "Enabled adducts: {}",
        adducts.iter().map(|a| a.name).collect::<Vec<_>>().join(", ")
    );

    let space = CandidateSpace::new(blocks, &params);
    let total = space.count();
    info!("Candidate space holds {} lipids", total);

    let scorer = Scorer::new(&spectra, &index, &params);
    let pipeline = SearchPipeline::new(FragmentMassBuilder::new(adducts.clone()), scorer, &params);

    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
    )
    .map_err(|e| CliError::Config {
        source: e.to_string(),
    })?;
    let progress = ProgressBar::new(total).with_style(style);
    let (session, summary) = pipeline.run(space.iter(), |n| progress.inc(n));
    progress.finish();

    results::write_all(
        &output.directory,
        &spectra.location,
        &session,
        &adducts,
        &summary,
        output.write_scores,
    )?;
    Ok(summary)
}
