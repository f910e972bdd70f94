use crate::math::LatLng;

/// Axis-aligned bounding box in (lat, lng) degrees.
///
/// `min[0]`/`max[0]` hold latitude, `min[1]`/`max[1]` longitude. Boxes never
/// wrap the antimeridian.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoBounds {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl GeoBounds {
    pub fn from_point(p: LatLng) -> Self {
        GeoBounds {
            min: [p.lat, p.lng],
            max: [p.lat, p.lng],
        }
    }

    /// Smallest box containing every point, `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut b = Self::from_point(first);
        for p in iter {
            b.extend(p);
        }
        Some(b)
    }

    pub fn extend(&mut self, p: LatLng) {
        self.min[0] = self.min[0].min(p.lat);
        self.min[1] = self.min[1].min(p.lng);
        self.max[0] = self.max[0].max(p.lat);
        self.max[1] = self.max[1].max(p.lng);
    }

    pub fn lat_span(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn lng_span(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    pub fn max_span(&self) -> f64 {
        self.lat_span().max(self.lng_span())
    }

    /// Box center (midpoint of the extremes, not the point centroid).
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        )
    }
}
