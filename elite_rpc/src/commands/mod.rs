mod set_collision_enable;
mod set_servo_status;
mod set_speed;
mod sys_var;
mod jbi_file;

pub use set_collision_enable::*;
pub use set_servo_status::*;
pub use set_speed::*;
pub use sys_var::*;
pub use jbi_file::*;
