use crate::error::InputError;
use log::{debug, warn};
use ndarray::{Array2, ArrayView1};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// The loaded dataset: one row per point, one column per feature.
///
/// Read-only once built, so any number of workers may read it concurrently.
#[derive(Clone, Debug)]
pub struct PointStore {
    data: Array2<f32>,
}

impl PointStore {
    pub fn new(data: Array2<f32>) -> Self {
        // Rows must be contiguous for the SIMD distance path.
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().to_owned()
        };
        PointStore { data }
    }

    /// Build a store from in-memory rows, each of exactly `features` values.
    pub fn from_rows(rows: Vec<Vec<f32>>, features: usize) -> Result<Self, InputError> {
        let n = rows.len();
        let mut flat = Vec::with_capacity(n * features);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != features {
                return Err(InputError::Dimension {
                    row,
                    expected: features,
                    found: values.len(),
                });
            }
            flat.extend(values);
        }
        let data = Array2::from_shape_vec((n, features), flat)?;
        Ok(PointStore { data })
    }

    /// Load points from a delimited text file.
    ///
    /// The file is read one line at a time and reading stops once
    /// `max_points` points are held. See [`PointStore::from_text`] for the
    /// accepted format.
    pub fn from_text_file<P: AsRef<Path>>(
        path: P,
        features: usize,
        max_points: usize,
    ) -> Result<Self, InputError> {
        let path = path.as_ref();
        let unreadable = |source| InputError::Unreadable {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(unreadable)?;
        let store = Self::parse(BufReader::new(file), features, max_points, unreadable)?;
        debug!(
            "Loaded {} points of dimension {} from {}",
            store.len(),
            features,
            path.display()
        );
        Ok(store)
    }

    /// Parse one point per line. Fields may be separated by any mix of commas,
    /// spaces and tabs. Fields past `features` are ignored and blank lines are
    /// skipped. At most `max_points` points are kept. `nan` and `inf` are
    /// rejected as malformed.
    ///
    /// An empty source gives an empty store, not an error.
    pub fn from_text(content: &str, features: usize, max_points: usize) -> Result<Self, InputError> {
        Self::parse(content.as_bytes(), features, max_points, |source| {
            InputError::Unreadable {
                path: PathBuf::new(),
                source,
            }
        })
    }

    fn parse<R, U>(
        mut reader: R,
        features: usize,
        max_points: usize,
        unreadable: U,
    ) -> Result<Self, InputError>
    where
        R: BufRead,
        U: Fn(io::Error) -> InputError,
    {
        let mut flat = Vec::new();
        let mut row = 0;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).map_err(&unreadable)? == 0 {
                break;
            }
            if buf.iter().all(|&b| is_delimiter(b as char) || b == b'\n') {
                continue;
            }
            if row == max_points {
                warn!(
                    "Point capacity of {} reached, ignoring the rest of the input",
                    max_points
                );
                break;
            }

            let line = std::str::from_utf8(&buf).map_err(|_| InputError::Malformed {
                row,
                feature: 0,
                text: String::from_utf8_lossy(&buf).trim_end().chars().take(20).collect(),
            })?;
            let mut fields = line
                .split(|c: char| is_delimiter(c) || c == '\n')
                .filter(|field| !field.is_empty());

            for feature in 0..features {
                let field = fields.next();
                let value = field
                    .and_then(|text| text.parse::<f32>().ok())
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| InputError::Malformed {
                        row,
                        feature,
                        text: field.unwrap_or_default().chars().take(20).collect(),
                    })?;
                flat.push(value);
            }
            row += 1;
        }

        let data = Array2::from_shape_vec((row, features), flat)?;
        Ok(PointStore { data })
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// Feature dimension.
    pub fn features(&self) -> usize {
        self.data.ncols()
    }

    #[inline]
    pub fn point(&self, i: usize) -> ArrayView1<'_, f32> {
        self.data.row(i)
    }

    pub fn get_vectors(&self) -> &Array2<f32> {
        &self.data
    }
}

#[inline]
fn is_delimiter(c: char) -> bool {
    matches!(c, ',' | ' ' | '\t' | '\r')
}
