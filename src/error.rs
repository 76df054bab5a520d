/// Contract violations when building shapes or parsing panel values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapeError {
    #[error("Radius must be finite and positive, got {0}")]
    InvalidRadius(f32),

    #[error("Size must be finite and positive, got {0}")]
    InvalidSize(f32),

    #[error("Center must have finite components, got {0:?}")]
    InvalidCenter([f32; 3]),

    #[error("Subdivision level {level} exceeds the maximum of {max}")]
    LevelTooHigh { level: u32, max: u32 },

    #[error("Invalid hex color: {0:?}")]
    InvalidColor(String),
}

pub(crate) fn check_center(center: glam::Vec3) -> Result<(), ShapeError> {
    if center.is_finite() {
        Ok(())
    } else {
        Err(ShapeError::InvalidCenter(center.to_array()))
    }
}

pub(crate) fn check_radius(radius: f32) -> Result<(), ShapeError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(ShapeError::InvalidRadius(radius))
    }
}

pub(crate) fn check_size(size: f32) -> Result<(), ShapeError> {
    if size.is_finite() && size > 0.0 {
        Ok(())
    } else {
        Err(ShapeError::InvalidSize(size))
    }
}
