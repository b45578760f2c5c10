//! One-shot hardware peripheral initialization.
//!
//! Configures the ADC1 oneshot unit and per-pin ADC channels and GPIO
//! directions using raw ESP-IDF sys calls. The unit is brought up once
//! from `main()`; individual pins are configured by the orchestrator
//! through the port traits before any task is spawned.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::pins::{ADC1_CHANNEL_COUNT, AdcChannel, Gpio};
#[cfg(target_os = "espidf")]
use crate::error::SensorError;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    /// Channel index does not exist or is not bonded to the given GPIO.
    InvalidAdcChannel { gpio: Gpio, channel: u32 },
    GpioConfigFailed(i32),
    /// GPIO number outside the chip's pad range.
    InvalidGpio(Gpio),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::InvalidAdcChannel { gpio, channel } => {
                write!(f, "ADC1 channel {} is not on GPIO {}", channel, gpio)
            }
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::InvalidGpio(pin) => write!(f, "GPIO {} does not exist", pin),
        }
    }
}

impl std::error::Error for HwInitError {}

/// Highest GPIO pad number on the ESP32-S3.
pub const MAX_GPIO: Gpio = 48;

/// ADC1 on the ESP32-S3 maps GPIO1..=GPIO10 onto channels 0..=9.
pub fn check_adc_channel(adc: AdcChannel) -> Result<(), HwInitError> {
    if adc.channel < ADC1_CHANNEL_COUNT && adc.gpio == adc.channel as Gpio + 1 {
        Ok(())
    } else {
        Err(HwInitError::InvalidAdcChannel {
            gpio: adc.gpio,
            channel: adc.channel,
        })
    }
}

pub fn check_gpio(pin: Gpio) -> Result<(), HwInitError> {
    if (0..=MAX_GPIO).contains(&pin) {
        Ok(())
    } else {
        Err(HwInitError::InvalidGpio(pin))
    }
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before any task is spawned.
    unsafe { init_adc_unit()? };
    info!("hw_init: ADC1 unit ready");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: The handle is written once in `init_adc_unit()` before any
/// task exists; afterwards it is only read.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc_unit() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn configure_adc_channel(adc: AdcChannel) -> Result<(), HwInitError> {
    check_adc_channel(adc)?;
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    // SAFETY: the unit is initialised in init_peripherals() before tasks exist.
    let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), adc.channel, &chan_cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }
    info!("hw_init: ADC1 CH{} on GPIO{} configured", adc.channel, adc.gpio);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Result<u16, SensorError> {
    let mut raw: i32 = 0;
    // SAFETY: the oneshot driver serialises concurrent reads internally.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(SensorError::AdcReadFailed);
    }
    Ok(raw.max(0) as u16)
}

// ── GPIO ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn configure_gpio_input(pin: Gpio) -> Result<(), HwInitError> {
    check_gpio(pin)?;
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: startup path, before any task touches the pin.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn configure_gpio_output(pin: Gpio) -> Result<(), HwInitError> {
    check_gpio(pin)?;
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: startup path, before any task touches the pin.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    unsafe { gpio_set_level(pin, 0) };
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: Gpio) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: Gpio, high: bool) {
    // SAFETY: each output pin has exactly one owning task.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}
