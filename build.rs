//! Detects whether the target core has a free-running cycle counter and
//! which byte transport the global recorder is built with.
//!
//! Bare-metal Armv6-M and Armv8-M Baseline cores lack DWT CYCCNT, and Arm
//! builds without the `cortex-m` feature have no driver for it; on those
//! targets the recorder compiles out to no-ops.

use std::env;

fn main() {
    println!("cargo::rustc-check-cfg=cfg(cycle_counter)");
    println!("cargo::rustc-check-cfg=cfg(capture_transport)");
    println!("cargo::rerun-if-changed=build.rs");

    let target = env::var("TARGET").unwrap_or_default();
    let arm = env::var("CARGO_CFG_TARGET_ARCH").is_ok_and(|arch| arch == "arm");
    let cortex_m = env::var_os("CARGO_FEATURE_CORTEX_M").is_some();
    let no_cyccnt = target.starts_with("thumbv6m") || target.starts_with("thumbv8m.base");

    if no_cyccnt {
        println!("cargo::warning=no DWT cycle counter on {target}; recorder disabled");
    } else if arm && !cortex_m {
        // Only the `cortex-m` feature brings in the DWT driver.
        println!("cargo::warning=`cortex-m` feature off on {target}; recorder disabled");
    } else {
        println!("cargo::rustc-cfg=cycle_counter");
    }

    // ITM needs real hardware; on the host it falls back to capture.
    let itm = env::var_os("CARGO_FEATURE_TRANSPORT_ITM").is_some() && arm;
    let rtt = env::var_os("CARGO_FEATURE_TRANSPORT_RTT").is_some();
    if !itm && !rtt {
        println!("cargo::rustc-cfg=capture_transport");
    }
}
