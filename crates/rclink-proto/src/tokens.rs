//! Wire token literals. Case-sensitive, compared by exact equality.

/// Identity token: detection-stream producer.
pub const ID_RECOGNITION: &str = "id_recognition";
/// Identity token: joystick command producer.
pub const ID_JOYSTICK: &str = "id_joystick";
/// Identity token: vehicle command consumer.
pub const ID_VEHICLE: &str = "id_vehicle";
/// Identity token: diagnostic endpoint.
pub const ID_FAKE: &str = "id_fake";

/// Handshake success reply.
pub const ID_APPROVED: &str = "id_approved";
/// Handshake failure marker.
pub const ERR_UNKNOWN: &str = "unknown";
/// Peer-initiated teardown marker.
pub const DISCONNECT: &str = "disconnect";

/// Drive both tracks forward. One power parameter in [0,100].
pub const JOY_FORWARD: &str = "joy_forward";
/// Drive both tracks in reverse. One power parameter in [0,100].
pub const JOY_BACKWARD: &str = "joy_backward";
/// Stop both tracks.
pub const JOY_NEUTRAL: &str = "joy_neutral";
/// Slew the steering servo left.
pub const JOY_DIR_LEFT: &str = "joy_dir_left";
/// Slew the steering servo right.
pub const JOY_DIR_RIGHT: &str = "joy_dir_right";
/// Center the steering servo.
pub const JOY_DIR_NEUTRAL: &str = "joy_dir_neutral";
