//! Contact manifolds reported after a step

use crate::body::BodyHandle;

/// One contact point of a manifold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    /// Signed distance; negative when the shapes overlap
    pub distance: f32,
    /// Impulse applied by the solver at this contact
    pub applied_impulse: f32,
    /// Contact point in world space (on the second body)
    pub position: [f32; 3],
    /// Contact normal in world space
    pub normal: [f32; 3],
}

impl ContactPoint {
    /// Whether the shapes actually overlap at this point
    pub fn is_penetrating(&self) -> bool {
        self.distance < 0.0
    }
}

/// Contact points between one pair of bodies for the last step
#[derive(Debug, Clone, PartialEq)]
pub struct ContactManifold {
    /// First body
    pub body0: BodyHandle,
    /// Second body
    pub body1: BodyHandle,
    /// Contact points
    pub points: Vec<ContactPoint>,
}

impl ContactManifold {
    pub fn new(body0: BodyHandle, body1: BodyHandle) -> Self {
        Self {
            body0,
            body1,
            points: Vec::new(),
        }
    }

    /// Add a contact point
    pub fn with_point(mut self, point: ContactPoint) -> Self {
        self.points.push(point);
        self
    }

    /// Number of contact points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the manifold has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Penetrating contact points only
    pub fn penetrating(&self) -> impl Iterator<Item = &ContactPoint> {
        self.points.iter().filter(|p| p.is_penetrating())
    }

    /// Penetrating point carrying the largest impulse
    pub fn max_impulse_point(&self) -> Option<&ContactPoint> {
        self.penetrating()
            .fold(None, |best: Option<&ContactPoint>, p| match best {
                Some(b) if b.applied_impulse >= p.applied_impulse => Some(b),
                _ => Some(p),
            })
    }
}
