//! Static language configuration table.
//!
//! One profile per supported language, enumerated at build time. The profile
//! `key` is what users select; `execution_id` is the identifier the remote
//! service expects, which may differ from the key.

/// Static per-language configuration.
#[derive(Debug, Clone, Copy)]
pub struct LanguageProfile {
    pub key: &'static str,
    pub execution_id: &'static str,
    /// Version string or "*" meaning latest available.
    pub version_selector: &'static str,
    /// Hint passed to the editor widget for syntax awareness.
    pub editor_mode: &'static str,
    /// Starter code shown when no saved code exists.
    pub example_source: &'static str,
    /// Cosmetic label, e.g. "main.py".
    pub display_file_name: &'static str,
}

pub const DEFAULT_LANGUAGE: &str = "python";

const PROFILES: &[LanguageProfile] = &[
    LanguageProfile {
        key: "c",
        execution_id: "c",
        version_selector: "*",
        editor_mode: "text/x-csrc",
        example_source: r#"#include <stdio.h>

int main() {
    int a, b;
    scanf("%d %d", &a, &b);
    printf("Sum = %d\n", a + b);
    return 0;
}
"#,
        display_file_name: "main.c",
    },
    LanguageProfile {
        key: "cpp",
        execution_id: "c++",
        version_selector: "*",
        editor_mode: "text/x-c++src",
        example_source: r#"#include <bits/stdc++.h>
using namespace std;

int main() {
    ios::sync_with_stdio(false);
    cin.tie(nullptr);

    int n;
    cin >> n;
    cout << "Square: " << n * n << "\n";
    return 0;
}
"#,
        display_file_name: "main.cpp",
    },
    LanguageProfile {
        key: "python",
        execution_id: "python",
        version_selector: "*",
        editor_mode: "python",
        example_source: r#"# Python example
name = input("Enter your name: ")
print("Hello,", name)
"#,
        display_file_name: "main.py",
    },
    LanguageProfile {
        key: "javascript",
        execution_id: "javascript",
        version_selector: "*",
        editor_mode: "javascript",
        example_source: r#"// Node.js example
const readline = require("readline");

const rl = readline.createInterface({
  input: process.stdin,
  output: process.stdout
});

let data = "";
rl.on("line", (line) => {
  data += line;
});
rl.on("close", () => {
  console.log("You typed:", data);
});
"#,
        display_file_name: "main.js",
    },
    LanguageProfile {
        key: "java",
        execution_id: "java",
        version_selector: "*",
        editor_mode: "text/x-java",
        example_source: r#"import java.util.*;

public class Main {
    public static void main(String[] args) {
        Scanner sc = new Scanner(System.in);
        int n = sc.nextInt();
        System.out.println("Double: " + (2 * n));
    }
}
"#,
        display_file_name: "Main.java",
    },
];

pub fn profiles() -> &'static [LanguageProfile] {
    PROFILES
}

/// Look up a profile by key.
pub fn profile(key: &str) -> Option<&'static LanguageProfile> {
    PROFILES.iter().find(|p| p.key == key)
}

/// Store key for the saved source of a language.
pub fn storage_key(key: &str) -> String {
    format!("code_{key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_resolve() {
        for key in ["c", "cpp", "python", "javascript", "java"] {
            let p = profile(key).unwrap();
            assert_eq!(p.key, key);
            assert!(!p.example_source.trim().is_empty());
            assert!(!p.display_file_name.is_empty());
        }
    }

    #[test]
    fn unknown_key_is_none() {
        assert!(profile("cobol").is_none());
    }

    #[test]
    fn keys_are_unique() {
        let mut keys: Vec<&str> = profiles().iter().map(|p| p.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), profiles().len());
    }

    #[test]
    fn default_language_exists() {
        assert!(profile(DEFAULT_LANGUAGE).is_some());
    }

    #[test]
    fn storage_key_format() {
        assert_eq!(storage_key("python"), "code_python");
    }
}
