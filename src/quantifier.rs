use crate::enums::Label;
use crate::volume::LabelVolume;

use std::fmt;

/// Voxel counts of the two hippocampal structures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VolumeStatistics {
    pub anterior: usize,
    pub posterior: usize,
    pub total: usize,
}

impl VolumeStatistics {
    /// Tally labels 1 and 2. Any other value counts as background.
    pub fn from_labels(labels: &LabelVolume) -> Self {
        let (anterior, posterior) =
            labels
                .data
                .iter()
                .fold((0, 0), |(anterior, posterior), &label| match label {
                    l if l == Label::Anterior as u8 => (anterior + 1, posterior),
                    l if l == Label::Posterior as u8 => (anterior, posterior + 1),
                    _ => (anterior, posterior),
                });

        Self {
            anterior,
            posterior,
            total: anterior + posterior,
        }
    }
}

impl fmt::Display for VolumeStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "volume ant: {}, volume post: {}, total volume: {}",
            self.anterior, self.posterior, self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn counts_known_voxels() {
        let mut data = Array3::<u8>::zeros((4, 4, 4));
        for (i, idx) in [[0, 0, 0], [1, 2, 3], [3, 3, 3], [2, 0, 1], [0, 3, 2]]
            .into_iter()
            .enumerate()
        {
            data[idx] = 1;
            if i < 3 {
                data[[idx[0], idx[1], (idx[2] + 1) % 4]] = 2;
            }
        }

        let stats = VolumeStatistics::from_labels(&LabelVolume::new(data));

        assert_eq!(stats.anterior, 5);
        assert_eq!(stats.posterior, 3);
        assert_eq!(stats.total, 8);
    }

    #[test]
    fn total_is_sum_of_parts() {
        let data = Array3::from_shape_fn((5, 6, 7), |(r, c, s)| ((r * 7 + c * 3 + s) % 4) as u8);
        let stats = VolumeStatistics::from_labels(&LabelVolume::new(data.clone()));

        assert_eq!(stats.anterior + stats.posterior, stats.total);
        assert_eq!(stats.anterior, data.iter().filter(|&&l| l == 1).count());
        assert_eq!(stats.posterior, data.iter().filter(|&&l| l == 2).count());
    }

    #[test]
    fn empty_labels_give_zero() {
        let stats = VolumeStatistics::from_labels(&LabelVolume::new(Array3::zeros((3, 3, 3))));
        assert_eq!(stats, VolumeStatistics::default());
    }
}
