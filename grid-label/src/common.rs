//! Common imports from external crates.

pub use anyhow::{bail, ensure, format_err, Context, Error, Result};
pub use bbox::{prelude::*, Transform, HW, XYWH};
pub use indexmap::{IndexMap, IndexSet};
pub use itertools::Itertools;
pub use label::{AnnotationRecord, GtBox, Label};
pub use log::{debug, info, warn};
pub use ndarray::{s, Array3, ArrayView1};
pub use serde::{Deserialize, Serialize};
pub use std::{
    collections::HashMap,
    fmt,
    num::NonZeroUsize,
    ops::AddAssign,
    path::{Path, PathBuf},
};
