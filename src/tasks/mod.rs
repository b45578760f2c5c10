//! Task bodies.
//!
//! Every task owns its board clone, its output pins and its private
//! state. Each exposes a single-step method used by tests and a `run`
//! loop that never returns.
//!
//! | Task         | Trigger              | Module       |
//! |--------------|----------------------|--------------|
//! | sampling     | period               | `sampling`   |
//! | heat lamp    | period               | `level`      |
//! | indicators   | half period          | `level`      |
//! | motor        | wake signal          | `motor`      |
//! | motion alarm | phase boundary       | `alarm`      |

pub mod alarm;
pub mod level;
pub mod motor;
pub mod sampling;
