use crate::backend::Backend;

/// Default size of each read issued by the pull adapters.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Configuration shared by every parsing operation.
///
/// Options only change *which* inputs are accepted and how values are
/// represented. For accepted input, the produced sequence never depends on
/// `chunk_size`, `backend` or the execution discipline.
///
/// # Default
///
/// Strict single-value JSON, exact numbers, order-preserving maps, the
/// software engine and 64 KiB reads.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Whether `/* ... */` and `// ...` comments are accepted wherever
    /// whitespace is.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_comments: bool,

    /// Whether the input is a concatenation of top-level JSON values.
    ///
    /// When `false`, anything but whitespace after the first complete value is
    /// a syntax error. When `true`, values may follow each other with or
    /// without separating whitespace.
    ///
    /// # Examples
    ///
    /// ```json
    /// {"x": 1}{"x": 2}
    /// ```
    ///
    /// ```json
    /// 1 2 3
    /// ```
    ///
    /// # Default
    ///
    /// `false`
    pub multiple_values: bool,

    /// Number of bytes the blocking and async adapters request from their
    /// source per read. Has no effect on output; zero is treated as one.
    ///
    /// # Default
    ///
    /// [`DEFAULT_CHUNK_SIZE`]
    pub chunk_size: usize,

    /// Concrete map type used when reconstructing objects.
    ///
    /// # Default
    ///
    /// [`MapRepresentation::Ordered`]
    pub map_representation: MapRepresentation,

    /// Whether non-integral numbers decode to an arbitrary-precision decimal
    /// (`true`) or to `f64` (`false`). Integral numbers are exact either way.
    ///
    /// # Default
    ///
    /// `true`
    pub use_exact_numbers: bool,

    /// The tokenizer engine driving the session.
    ///
    /// # Default
    ///
    /// [`Backend::Software`]
    pub backend: Backend,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            allow_comments: false,
            multiple_values: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
            map_representation: MapRepresentation::default(),
            use_exact_numbers: true,
            backend: Backend::default(),
        }
    }
}

impl ParseOptions {
    /// Read size actually used by the pull adapters.
    pub(crate) fn read_size(&self) -> usize {
        self.chunk_size.max(1)
    }
}

/// How reconstructed objects store their members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapRepresentation {
    /// Members keep document order.
    #[default]
    Ordered,
    /// Members are hashed; iteration order is unspecified.
    Unordered,
}
