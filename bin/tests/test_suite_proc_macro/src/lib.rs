use quote::{format_ident, quote};

/// Generates one `#[test]` per `.lox` script found below `bin/tests`, each calling `lox_expect`.
#[proc_macro]
pub fn generate_tests(_: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let root_dir = format!("{}/..", env!("CARGO_MANIFEST_DIR"));
    let mut scripts = walkdir::WalkDir::new(&root_dir)
        .sort_by_file_name()
        .into_iter()
        .flatten()
        .filter(|entry| entry.path().extension() == Some("lox".as_ref()))
        .peekable();

    assert!(scripts.peek().is_some(), "no .lox scripts found below {root_dir}");

    let tests = scripts.map(|entry| {
        let test_file_path = entry.path().to_string_lossy().to_string();
        let relative_test_path = entry
            .path()
            .strip_prefix(&root_dir)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .replace(['/', '-', '.'], "_");
        let test_ident = format_ident!("test_{}", relative_test_path.trim_end_matches("_lox"));
        quote! {
            #[test]
            fn #test_ident() {
                lox_expect(std::fs::read_to_string(#test_file_path).unwrap().as_str());
            }
        }
    });

    quote! {
        #[ctor::ctor]
        fn init() {
            let _ = env_logger::builder().is_test(true).try_init();
        }

        #(#tests)*
    }
    .into()
}
