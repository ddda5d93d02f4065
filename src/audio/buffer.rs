use ndarray::{Array1, Array2, ArrayD, ArrayViewD, CowArray, IxDyn};

/// Errors raised when constructing an [`AudioBuffer`].
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("audio buffer must be (samples,) or (channels, samples), got {0} dimensions")]
    Rank(usize),
    #[error("audio buffer has no channels")]
    NoChannels,
    #[error("channel {index} has {len} samples, expected {expected}")]
    ChannelLength {
        index: usize,
        len: usize,
        expected: usize,
    },
}

/// A decoded audio signal.
///
/// Samples are stored either as a mono `(samples,)` array or planar
/// `(channels, samples)`. The buffer is never mutated; backends read it or a
/// reshaped view of it.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: ArrayD<f32>,
}

impl AudioBuffer {
    pub fn new(samples: ArrayD<f32>) -> Result<Self, BufferError> {
        match samples.ndim() {
            1 => {}
            2 if samples.shape()[0] == 0 => return Err(BufferError::NoChannels),
            2 => {}
            rank => return Err(BufferError::Rank(rank)),
        }
        Ok(Self { samples })
    }

    pub fn mono(samples: Vec<f32>) -> Self {
        Self {
            samples: Array1::from(samples).into_dyn(),
        }
    }

    /// Build a planar `(channels, samples)` buffer from per-channel vectors.
    pub fn from_channels(channels: Vec<Vec<f32>>) -> Result<Self, BufferError> {
        let expected = channels.first().ok_or(BufferError::NoChannels)?.len();
        if let Some((index, channel)) = channels
            .iter()
            .enumerate()
            .find(|(_, channel)| channel.len() != expected)
        {
            return Err(BufferError::ChannelLength {
                index,
                len: channel.len(),
                expected,
            });
        }
        let planar = Array2::from_shape_fn((channels.len(), expected), |(c, i)| channels[c][i]);
        Ok(Self {
            samples: planar.into_dyn(),
        })
    }

    pub fn ndim(&self) -> usize {
        self.samples.ndim()
    }

    pub fn shape(&self) -> &[usize] {
        self.samples.shape()
    }

    pub fn channels(&self) -> usize {
        match self.ndim() {
            1 => 1,
            _ => self.samples.shape()[0],
        }
    }

    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.samples.shape()[self.ndim() - 1]
    }

    /// The buffer in its original layout.
    pub fn view(&self) -> ArrayViewD<'_, f32> {
        self.samples.view()
    }

    /// Channel-last, contiguous copy of the signal.
    ///
    /// Mono buffers are borrowed as-is; planar buffers become
    /// `(samples, channels)` in standard layout, so iterating yields
    /// interleaved frames.
    pub fn to_channels_last(&self) -> CowArray<'_, f32, IxDyn> {
        if self.ndim() == 1 {
            return CowArray::from(self.samples.view());
        }
        let transposed = self.samples.view().reversed_axes();
        if transposed.is_standard_layout() {
            CowArray::from(transposed)
        } else {
            CowArray::from(transposed.as_standard_layout().into_owned())
        }
    }
}
