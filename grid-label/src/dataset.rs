//! Dataset loading and image size lookup.

use crate::{
    common::*,
    config::{default_image_extensions, DatasetConfig},
    encoder::{EncodeReport, GridEncoder},
    grid::GridLabel,
};

/// Query the native pixel size of an image by its identifier.
pub trait ImageSizeLookup {
    fn image_size(&self, id: &str) -> Option<HW<usize>>;
}

impl ImageSizeLookup for HashMap<String, HW<usize>> {
    fn image_size(&self, id: &str) -> Option<HW<usize>> {
        self.get(id).copied()
    }
}

impl ImageSizeLookup for IndexMap<String, HW<usize>> {
    fn image_size(&self, id: &str) -> Option<HW<usize>> {
        self.get(id).copied()
    }
}

/// A directory of `{ID}.{ext}` image files.
#[derive(Debug, Clone)]
pub struct ImageDir {
    dir: PathBuf,
    extensions: Vec<String>,
}

impl ImageDir {
    pub fn new(dir: impl AsRef<Path>, extensions: Vec<String>) -> Result<Self> {
        let dir = dir.as_ref();
        ensure!(
            dir.is_dir(),
            "the image directory '{}' does not exist",
            dir.display()
        );
        let extensions = if extensions.is_empty() {
            default_image_extensions()
        } else {
            extensions
        };

        Ok(Self {
            dir: dir.to_owned(),
            extensions,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Find the image file of `id`, trying extensions in order.
    pub fn find_image(&self, id: &str) -> Option<PathBuf> {
        self.extensions
            .iter()
            .map(|ext| self.dir.join(format!("{}.{}", id, ext)))
            .find(|path| path.is_file())
    }

    /// List image files in the directory, sorted by path. Extensions match
    /// case-sensitively, as in [find_image](Self::find_image).
    pub fn list_images(&self) -> Result<Vec<PathBuf>> {
        let dir = self
            .dir
            .to_str()
            .ok_or_else(|| format_err!("non-UTF-8 path '{}'", self.dir.display()))?;
        let pattern = format!("{}/*", glob::Pattern::escape(dir));

        let paths: Vec<_> = glob::glob(&pattern)?
            .map(|result| -> Result<_> {
                let path = result?;
                let matched = path.is_file()
                    && path
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .map(|ext| self.extensions.iter().any(|allowed| ext == allowed))
                        .unwrap_or(false);
                Ok(matched.then(|| path))
            })
            .filter_map(|result| result.transpose())
            .try_collect()?;

        Ok(paths.into_iter().sorted().collect())
    }
}

impl ImageSizeLookup for ImageDir {
    fn image_size(&self, id: &str) -> Option<HW<usize>> {
        let path = match self.find_image(id) {
            Some(path) => path,
            None => {
                warn!(
                    "no image file for '{}' under '{}'",
                    id,
                    self.dir.display()
                );
                return None;
            }
        };

        match imagesize::size(&path) {
            Ok(imagesize::ImageSize { width, height }) => HW::try_from_wh([width, height]).ok(),
            Err(err) => {
                warn!("failed to read size of '{}': {}", path.display(), err);
                None
            }
        }
    }
}

/// Annotation records paired with their image directory.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<AnnotationRecord>,
    pub images: ImageDir,
}

impl Dataset {
    pub fn load(config: &DatasetConfig) -> Result<Self> {
        let DatasetConfig {
            image_dir,
            annotation_file,
            image_extensions,
        } = config;

        let records = label::load_odgt(annotation_file)?;
        let images = ImageDir::new(image_dir, image_extensions.clone())?;
        info!(
            "loaded {} annotation records from '{}'",
            records.len(),
            annotation_file.display()
        );

        Ok(Self { records, images })
    }

    pub fn encode(
        &self,
        encoder: &GridEncoder,
    ) -> Result<(IndexMap<String, GridLabel>, EncodeReport)> {
        let (labels, report) = encoder.encode_all_with_report(&self.records, &self.images)?;
        info!(
            "encoded {} boxes over {} images, {} collisions",
            report.encoded, report.images, report.collisions
        );
        Ok((labels, report))
    }

    pub fn find_record(&self, id: &str) -> Option<&AnnotationRecord> {
        self.records.iter().find(|record| record.id == id)
    }
}
