use anyhow::{format_err, Context, Result};
use grid_label::{metrics, Config, Dataset, GridEncoder, SparseGridLabel};
use indexmap::IndexMap;
use log::info;
use prettytable::{cell, row, Table};
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};
use structopt::StructOpt;

#[derive(Debug, Clone, StructOpt)]
/// Encode person annotations into grid labels.
enum Args {
    /// Encode the whole dataset and print a summary.
    Encode {
        #[structopt(long, default_value = "grid.json5")]
        /// configuration file
        config_file: PathBuf,
        #[structopt(long)]
        /// write the sparse grid labels to this JSON file
        output_file: Option<PathBuf>,
    },
    /// Print the occupied cells of one image.
    Inspect {
        #[structopt(long, default_value = "grid.json5")]
        /// configuration file
        config_file: PathBuf,
        /// image identifier
        id: String,
    },
    /// Compare predicted object counts against the encoded labels.
    Score {
        #[structopt(long, default_value = "grid.json5")]
        /// configuration file
        config_file: PathBuf,
        /// JSON object mapping image identifiers to predicted counts
        predictions_file: PathBuf,
    },
    /// List the image files of the dataset.
    ListImages {
        #[structopt(long, default_value = "grid.json5")]
        /// configuration file
        config_file: PathBuf,
    },
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    match Args::from_args() {
        Args::Encode {
            config_file,
            output_file,
        } => encode(config_file, output_file)?,
        Args::Inspect { config_file, id } => inspect(config_file, &id)?,
        Args::Score {
            config_file,
            predictions_file,
        } => score(config_file, predictions_file)?,
        Args::ListImages { config_file } => list_images(config_file)?,
    }

    Ok(())
}

fn load(config_file: impl AsRef<Path>) -> Result<(Config, Dataset)> {
    let config_file = config_file.as_ref();
    let config = Config::open(config_file)
        .with_context(|| format!("failed to load config file '{}'", config_file.display()))?;
    let dataset = Dataset::load(&config.dataset)?;
    Ok((config, dataset))
}

fn encode(config_file: impl AsRef<Path>, output_file: Option<PathBuf>) -> Result<()> {
    let (config, dataset) = load(config_file)?;
    let encoder = GridEncoder::new(config.grid.clone())?;
    let (labels, report) = dataset.encode(&encoder)?;

    {
        let num_objects: usize =
            metrics::count_objects(labels.values(), config.grid.confidence_threshold)
                .into_iter()
                .sum();

        let mut table = Table::new();
        table.add_row(row!["images", report.images]);
        table.add_row(row!["encoded boxes", report.encoded]);
        table.add_row(row!["skipped by tag", report.skipped_tag]);
        table.add_row(row!["ignored boxes", report.skipped_ignored]);
        table.add_row(row!["invalid boxes", report.invalid]);
        table.add_row(row!["out of frame", report.out_of_frame]);
        table.add_row(row!["collisions", report.collisions]);
        table.add_row(row!["objects", num_objects]);
        table.printstd();
    }

    if let Some(output_file) = output_file {
        let sparse: IndexMap<&str, SparseGridLabel> = labels
            .iter()
            .map(|(id, label)| (id.as_str(), label.to_sparse()))
            .collect();
        let writer = BufWriter::new(
            File::create(&output_file)
                .with_context(|| format!("failed to create '{}'", output_file.display()))?,
        );
        serde_json::to_writer(writer, &sparse)?;
        info!("grid labels are saved to '{}'", output_file.display());
    }

    Ok(())
}

fn inspect(config_file: impl AsRef<Path>, id: &str) -> Result<()> {
    let (config, dataset) = load(config_file)?;
    let record = dataset
        .find_record(id)
        .ok_or_else(|| format_err!("no annotation record for '{}'", id))?;
    let encoder = GridEncoder::new(config.grid)?;
    let labels = encoder.encode_all(std::slice::from_ref(record), &dataset.images)?;
    let label = &labels[id];

    let mut table = Table::new();
    table.add_row(row!["s_x", "s_y", "offset_x", "offset_y", "w", "h", "confidence"]);
    label.occupied_cells().for_each(|cell| {
        table.add_row(row![
            cell.s_x,
            cell.s_y,
            format!("{:.2}", cell.offset_x),
            format!("{:.2}", cell.offset_y),
            cell.w,
            cell.h,
            cell.confidence
        ]);
    });
    table.printstd();

    Ok(())
}

fn score(config_file: impl AsRef<Path>, predictions_file: impl AsRef<Path>) -> Result<()> {
    let predictions_file = predictions_file.as_ref();
    let (config, dataset) = load(config_file)?;
    let predictions: IndexMap<String, f64> = {
        let reader = BufReader::new(File::open(predictions_file).with_context(|| {
            format!("failed to open '{}'", predictions_file.display())
        })?);
        serde_json::from_reader(reader)?
    };

    let encoder = GridEncoder::new(config.grid.clone())?;
    let (labels, _) = dataset.encode(&encoder)?;

    let (targets, predictions): (Vec<_>, Vec<_>) = predictions
        .iter()
        .map(|(id, &prediction)| -> Result<_> {
            let label = labels
                .get(id)
                .ok_or_else(|| format_err!("no annotation record for '{}'", id))?;
            Ok((label.num_objects(config.grid.confidence_threshold), prediction))
        })
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .unzip();

    let error = metrics::relative_count_error(&targets, &predictions)?;
    println!("relative count error over {} images: {:.4}", targets.len(), error);

    Ok(())
}

fn list_images(config_file: impl AsRef<Path>) -> Result<()> {
    let (_config, dataset) = load(config_file)?;
    let images = dataset.images.list_images()?;

    println!("found {} images", images.len());
    images
        .iter()
        .for_each(|path| println!("{}", path.display()));

    Ok(())
}
