//! How to request verified time from a Roughtime server.

use chrono::TimeZone;

fn main() {
    // int08h's public roughenough server; the key is published out of band.
    let public_key =
        roughtime_client::decode_public_key("etPaaIxcBMY1oUeGpwvPMCJMwlRVNxv51KK/tktoJTQ=")
            .unwrap();
    let result = roughtime_client::request("roughtime.int08h.com:2002", &public_key).unwrap();

    let local_time = chrono::Local
        .timestamp_micros(result.midpoint_us as i64)
        .unwrap();
    println!("midpoint: {}", local_time);
    println!("radius:   ±{} seconds", result.radius_seconds());
    println!(
        "delegation valid: {} .. {} (us since epoch)",
        result.delegation.min_t, result.delegation.max_t
    );
}
