use std::fs;
use std::path::Path;
use std::process::Command;

const DEMO_CAFE_ID: u32 = 1;

fn main() {
    println!("🚀 Building cafe_likes WASM with demo page...");

    // 1. wasm-pack でビルド
    println!("📦 Running wasm-pack build...");
    let status = Command::new("wasm-pack")
        .env("CARGO_INCREMENTAL", "1")
        .args(&[
            "build",
            "--dev", // devビルドで高速化
            "--target",
            "web",
            "--out-dir",
            "pkg",
            "--no-default-features",
            "--features",
            "wasm",
        ])
        .status()
        .expect("Failed to execute wasm-pack");

    if !status.success() {
        eprintln!("❌ wasm-pack build failed");
        std::process::exit(1);
    }

    println!("✅ WASM build completed");

    let pkg_dir = Path::new("pkg");
    if !pkg_dir.join("cafe_likes.js").exists() {
        eprintln!("⚠️  Warning: pkg/cafe_likes.js not found");
    }

    // 2. デモ用HTMLを生成
    println!("📝 Generating HTML file...");
    let cafe_id = std::env::args()
        .nth(1)
        .and_then(|id| id.parse().ok())
        .unwrap_or(DEMO_CAFE_ID);
    generate_demo_html(pkg_dir, cafe_id);

    println!("✅ HTML file generated:");
    println!("   - pkg/index.html (cafe {})", cafe_id);
    println!("\n🎉 Build complete! Serve pkg/ from the same origin as the likes API.");
}

fn generate_demo_html(pkg_dir: &Path, cafe_id: u32) {
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Cafe {cafe_id}</title>
</head>
<body>
    <form>
        <button id="like" style="display: none">Like</button>
        <button id="unlike" style="display: none">Unlike</button>
    </form>
    <script type="module">
        import init, {{ start_liking }} from './cafe_likes.js';
        const cafeId = {cafe_id};
        init().then(() => start_liking(cafeId)).catch(console.error);
    </script>
</body>
</html>
"#
    );

    fs::write(pkg_dir.join("index.html"), html).expect("Failed to write index.html");
}
