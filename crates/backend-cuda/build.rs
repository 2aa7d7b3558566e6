//! Build script for gpufft-backend-cuda.
//!
//! Locates the CUDA toolkit and adds its library directory to the link search
//! path so the `cufft` link attribute resolves.

fn main() {
    #[cfg(feature = "cuda")]
    {
        link_cufft();
    }
}

#[cfg(feature = "cuda")]
fn link_cufft() {
    use std::path::Path;

    // CUDA_PATH (Windows convention), then CUDA_HOME (Linux), then common prefixes
    let cuda_path = std::env::var("CUDA_PATH")
        .or_else(|_| std::env::var("CUDA_HOME"))
        .unwrap_or_else(|_| {
            ["/usr/local/cuda", "/opt/cuda", "/usr/lib/cuda"]
                .into_iter()
                .find(|path| Path::new(path).exists())
                .unwrap_or("/usr/local/cuda")
                .to_string()
        });

    let lib_path = if cfg!(target_os = "windows") {
        format!("{cuda_path}/lib/x64")
    } else {
        let lib64 = format!("{cuda_path}/lib64");
        if Path::new(&lib64).exists() {
            lib64
        } else {
            format!("{cuda_path}/lib")
        }
    };

    println!("cargo:rustc-link-search=native={lib_path}");
    println!("cargo:rustc-link-lib=cufft");
    println!("cargo:rerun-if-env-changed=CUDA_PATH");
    println!("cargo:rerun-if-env-changed=CUDA_HOME");
}
