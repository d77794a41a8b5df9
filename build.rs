fn main() {
    // Stamp the build time into BUILD_DATE for `pcbpost --verbose`
    let build_date = chrono::Utc::now()
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string();
    println!("cargo:rustc-env=BUILD_DATE={}", build_date);
}
