use rayon::prelude::*;

/// Below this many samples the gather runs on a single rayon task.
const GATHER_MIN_LEN: usize = 4096;

/// Borrowed batch view (zero-copy).
#[derive(Debug, Clone, Copy)]
pub struct BatchRef<'a> {
    pub xs: &'a [f64],
    pub ys: &'a [f64],
}

impl<'a> BatchRef<'a> {
    /// Wraps two slices already known to have the same length.
    #[inline]
    pub fn new(xs: &'a [f64], ys: &'a [f64]) -> Self {
        debug_assert_eq!(xs.len(), ys.len(), "xs and ys must have same length");
        Self { xs, ys }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

/// Scratch buffers the permuted samples of a batch are copied into.
///
/// Reused across batches and epochs, so once it has grown to the batch size
/// no further allocation happens.
#[derive(Debug, Default)]
pub struct BatchBuffer {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl BatchBuffer {
    pub fn with_capacity(batch_size: usize) -> Self {
        Self {
            xs: Vec::with_capacity(batch_size),
            ys: Vec::with_capacity(batch_size),
        }
    }

    /// Copies `(xs[i], ys[i])` for every `i` in `indices`, in order.
    ///
    /// # Panics
    /// If any index is out of bounds for `xs` or `ys`.
    pub fn gather(&mut self, xs: &[f64], ys: &[f64], indices: &[usize]) -> BatchRef<'_> {
        let len = indices.len();
        self.xs.resize(len, 0.0);
        self.ys.resize(len, 0.0);

        self.xs
            .par_iter_mut()
            .zip(self.ys.par_iter_mut())
            .zip(indices.par_iter())
            .with_min_len(GATHER_MIN_LEN)
            .for_each(|((bx, by), &idx)| {
                *bx = xs[idx];
                *by = ys[idx];
            });

        BatchRef::new(&self.xs, &self.ys)
    }
}
