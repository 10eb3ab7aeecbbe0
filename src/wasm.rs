//! WebAssembly bindings for partint.
//!
//! This module provides JavaScript-friendly wrappers around 64-bit values
//! tracked with a 6-bit window.

use wasm_bindgen::prelude::*;
use crate::{Int64, Lattice, Session};
use crate::script::parse_script;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// WebAssembly-friendly partially-known 64-bit integer.
#[wasm_bindgen]
#[derive(Clone, Copy)]
pub struct WasmInt {
    value: Int64,
}

#[wasm_bindgen]
impl WasmInt {
    /// Decode a digit string over `0`, `1`, `u`.
    #[wasm_bindgen(constructor)]
    pub fn new(digits: &str) -> Result<WasmInt, JsError> {
        let value = Int64::parse(digits).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self { value })
    }

    /// Exact constant.
    #[wasm_bindgen]
    pub fn constant(value: u64) -> WasmInt {
        Self { value: Int64::constant(value) }
    }

    #[wasm_bindgen]
    pub fn add(&self, other: &WasmInt) -> WasmInt {
        Self { value: self.value.add(&other.value) }
    }

    #[wasm_bindgen]
    pub fn sub(&self, other: &WasmInt) -> WasmInt {
        Self { value: self.value.subtract(&other.value) }
    }

    #[wasm_bindgen]
    pub fn mul(&self, other: &WasmInt) -> WasmInt {
        Self { value: self.value.multiply(&other.value) }
    }

    #[wasm_bindgen]
    pub fn neg(&self) -> WasmInt {
        Self { value: self.value.negate() }
    }

    #[wasm_bindgen]
    pub fn join(&self, other: &WasmInt) -> WasmInt {
        Self { value: self.value.join(&other.value) }
    }

    #[wasm_bindgen]
    pub fn meet(&self, other: &WasmInt) -> WasmInt {
        Self { value: self.value.meet(&other.value) }
    }

    /// Shift left; `amount` must be between 1 and 63.
    #[wasm_bindgen]
    pub fn shl(&self, amount: u32) -> Result<WasmInt, JsError> {
        self.value
            .checked_left_shift(amount as usize)
            .map(|value| Self { value })
            .ok_or_else(|| JsError::new(&format!("shift by {} out of range", amount)))
    }

    /// Check whether a concrete value is admitted.
    #[wasm_bindgen]
    pub fn admits(&self, value: u64) -> bool {
        self.value.admits(value)
    }

    /// Viable window states of one bit position.
    #[wasm_bindgen]
    pub fn states(&self, bit: u32) -> Result<Vec<u32>, JsError> {
        if bit >= 64 {
            return Err(JsError::new(&format!("bit {} out of range", bit)));
        }
        Ok(self.value.states(bit as usize).iter().collect())
    }

    /// Render as digits, optionally keeping leading zeros.
    #[wasm_bindgen]
    pub fn write(&self, trim_leading_zeros: bool) -> String {
        self.value.write(trim_leading_zeros)
    }

    #[wasm_bindgen(js_name = toString)]
    pub fn to_string_js(&self) -> String {
        self.value.to_string()
    }

    /// Records as JSON.
    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.value).map_err(|e| JsError::new(&e.to_string()))
    }
}

/// Run a script over 64-bit values and return the emitted lines.
#[wasm_bindgen(js_name = runScript)]
pub fn run_script(source: &str) -> Result<js_sys::Array, JsError> {
    let script = parse_script(source).map_err(|e| JsError::new(&e.to_string()))?;
    let mut session = Session::<64, 6>::new();
    let lines = session.run(&script).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(lines.into_iter().map(JsValue::from).collect())
}
