/// Phases of a vertical pan on the drawer header.
///
/// `translation_y` is cumulative since `Began`, in points. `velocity_y` is in
/// points per second, positive downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PanGesture {
    Began,
    Changed { translation_y: f32 },
    Ended { velocity_y: f32 },
    Cancelled,
    Failed,
}
