//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements               | Connects to              |
//! |------------|--------------------------|--------------------------|
//! | `hardware` | SensorPort, ActuatorPort | ESP32 ADC1, GPIO         |
//! |            | TimePort                 | esp_timer, vTaskDelay    |
//! | `sim`      | SensorPort, ActuatorPort | shared atomics (host)    |
//! |            | TimePort                 | virtual or wall clock    |
//! | `log_sink` | EventSink                | Serial log output        |
//! | `time`     | (used by the above)      | monotonic clock          |

#[cfg(target_os = "espidf")]
pub mod hardware;
pub mod log_sink;
pub mod sim;
pub mod time;
