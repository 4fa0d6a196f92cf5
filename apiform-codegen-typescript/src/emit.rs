use apiform_core::codegen::{ArtifactKind, GeneratorContext};
use itertools::Itertools;

/// The widest line that generated code tries to stay within.
const MAX_WIDTH: usize = 80;

/// Assembles a TypeScript module from a directive, imports, and
/// top-level items.
pub struct TsModule<'a> {
    cx: GeneratorContext<'a>,
    kind: ArtifactKind,
    directive: Option<&'static str>,
    imports: Vec<String>,
    items: Vec<String>,
}

impl<'a> TsModule<'a> {
    /// Creates an empty module for an artifact. Client-side artifacts
    /// start with `'use client'` unless the options turn it off.
    pub fn new(cx: GeneratorContext<'a>, kind: ArtifactKind) -> Self {
        let directive = (kind.is_client_side() && cx.options().use_client_directive)
            .then_some("use client");
        Self {
            cx,
            kind,
            directive,
            imports: vec![],
            items: vec![],
        }
    }

    /// Replaces the module's directive, like `'use server'`.
    pub fn directive(&mut self, directive: &'static str) -> &mut Self {
        self.directive = Some(directive);
        self
    }

    /// Adds `import { names } from 'module';`.
    pub fn import<S: AsRef<str>>(
        &mut self,
        names: impl IntoIterator<Item = S>,
        module: &str,
    ) -> &mut Self {
        self.push_import("import", names, module)
    }

    /// Adds `import type { names } from 'module';`.
    pub fn import_type<S: AsRef<str>>(
        &mut self,
        names: impl IntoIterator<Item = S>,
        module: &str,
    ) -> &mut Self {
        self.push_import("import type", names, module)
    }

    fn push_import<S: AsRef<str>>(
        &mut self,
        keyword: &str,
        names: impl IntoIterator<Item = S>,
        module: &str,
    ) -> &mut Self {
        let names = names
            .into_iter()
            .map(|name| name.as_ref().to_owned())
            .sorted()
            .dedup()
            .collect_vec();
        if !names.is_empty() {
            self.imports.push(import_decl(keyword, &names, module));
        }
        self
    }

    /// Adds a top-level item. Items are separated by blank lines.
    pub fn item(&mut self, item: impl Into<String>) -> &mut Self {
        self.items.push(item.into());
        self
    }

    pub fn into_string(self) -> String {
        let mut out = String::new();
        if let Some(directive) = self.directive {
            out.push_str(&format!("{};\n\n", string_lit(directive)));
        }

        let custom = self
            .cx
            .custom_imports(self.kind)
            .iter()
            .map(|line| line.trim());
        for import in self.imports.iter().map(String::as_str).chain(custom) {
            out.push_str(import);
            out.push('\n');
        }

        for item in &self.items {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(item.trim_end());
            out.push('\n');
        }
        out
    }
}

/// Formats an import declaration, breaking one name per line
/// if it doesn't fit on one line.
fn import_decl(keyword: &str, names: &[String], module: &str) -> String {
    let module = string_lit(module);
    let line = format!("{keyword} {{ {} }} from {module};", names.iter().join(", "));
    if line.len() <= MAX_WIDTH {
        return line;
    }
    format!(
        "{keyword} {{\n{}}} from {module};",
        names.iter().format_with("", |name, f| f(&format_args!("  {name},\n"))),
    )
}

/// Formats a JSDoc comment with an optional description and `@tags`
/// line, indented by `indent`. Returns an empty string if there's
/// nothing to document.
pub fn jsdoc(indent: &str, description: Option<&str>, tags: &[String]) -> String {
    let width = MAX_WIDTH.saturating_sub(indent.len() + 3).max(20);
    let mut lines = vec![];
    if let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) {
        for paragraph in description.lines() {
            if paragraph.trim().is_empty() {
                lines.push(String::new());
                continue;
            }
            lines.extend(
                textwrap::wrap(paragraph.trim_end(), width)
                    .into_iter()
                    .map(|line| line.into_owned()),
            );
        }
    }
    if !tags.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("@tags {}", tags.iter().join(", ")));
    }
    if lines.is_empty() {
        return String::new();
    }

    let body = lines.iter().format_with("", |line, f| {
        // `*/` would end the comment early.
        let line = line.replace("*/", "*\\/");
        if line.is_empty() {
            f(&format_args!("{indent} *\n"))
        } else {
            f(&format_args!("{indent} * {line}\n"))
        }
    });
    format!("{indent}/**\n{body}{indent} */\n")
}

/// Formats the parameter list of a function declaration, with one
/// parameter per line: `(\n  params: GetUserParams,\n)`.
pub fn param_list(params: &[String]) -> String {
    if params.is_empty() {
        return "()".to_owned();
    }
    format!(
        "(\n{})",
        params
            .iter()
            .format_with("", |param, f| f(&format_args!("  {param},\n")))
    )
}

/// Formats a single-quoted TypeScript string literal.
pub fn string_lit(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    use crate::tests::Fixture;

    #[test]
    fn test_string_lit_escapes() {
        assert_eq!(string_lit("/users/:id"), "'/users/:id'");
        assert_eq!(string_lit("it's"), r"'it\'s'");
        assert_eq!(string_lit("a\\b"), r"'a\\b'");
        assert_eq!(string_lit("line\nbreak"), r"'line\nbreak'");
        assert_eq!(string_lit("\u{0}"), r"'\u{0}'");
    }

    #[test]
    fn test_param_list() {
        assert_eq!(param_list(&[]), "()");
        assert_eq!(
            param_list(&["params: GetUserParams".to_owned(), "query?: GetUserQuery".to_owned()]),
            "(\n  params: GetUserParams,\n  query?: GetUserQuery,\n)"
        );
    }

    #[test]
    fn test_jsdoc_description_and_tags() {
        let doc = jsdoc("", Some("Get user by ID"), &["users".to_owned(), "query".to_owned()]);

        assert_eq!(
            doc,
            indoc::indoc! {"
                /**
                 * Get user by ID
                 *
                 * @tags users, query
                 */
            "}
        );
    }

    #[test]
    fn test_jsdoc_wraps_and_indents() {
        let description = "Lists every user in the organization, with pagination, filtering by role, and sorting.";
        let doc = jsdoc("  ", Some(description), &[]);

        assert_eq!(
            doc,
            concat!(
                "  /**\n",
                "   * Lists every user in the organization, with pagination, filtering by role,\n",
                "   * and sorting.\n",
                "   */\n",
            )
        );
    }

    #[test]
    fn test_jsdoc_escapes_comment_end() {
        let doc = jsdoc("", Some("Matches /files/*/"), &[]);

        assert_eq!(doc, "/**\n * Matches /files/*\\/\n */\n");
    }

    #[test]
    fn test_jsdoc_empty() {
        assert_eq!(jsdoc("", None, &[]), "");
        assert_eq!(jsdoc("", Some("  "), &[]), "");
    }

    #[test]
    fn test_module_layout() {
        let fixture = Fixture::new(
            indoc::indoc! {r#"
                provider = "vite"
                endpoints = "e.yaml"
                output = "out"

                [options.custom-imports]
                hooks = ['  import { toast } from "sonner";  ']
            "#},
            "baseUrl: https://api.example.com\nendpoints: {}\n",
        );
        let mut module = TsModule::new(fixture.cx(), ArtifactKind::Hooks);
        module
            .import(["useQuery", "useMutation", "useQuery"], "@tanstack/react-query")
            .import_type(Vec::<String>::new(), "./types")
            .item("export const a = 1;\n\n")
            .item("export const b = 2;");

        assert_eq!(
            module.into_string(),
            indoc::indoc! {r#"
                'use client';

                import { useMutation, useQuery } from '@tanstack/react-query';
                import { toast } from "sonner";

                export const a = 1;

                export const b = 2;
            "#}
        );
    }

    #[test]
    fn test_long_import_breaks_lines() {
        let names = [
            "CreateUserBody",
            "CreateUserResponse",
            "GetUserParams",
            "GetUserResponse",
            "ListUsersQuery",
        ];

        assert_eq!(
            import_decl("import type", &names.map(String::from), "./types"),
            indoc::indoc! {"
                import type {
                  CreateUserBody,
                  CreateUserResponse,
                  GetUserParams,
                  GetUserResponse,
                  ListUsersQuery,
                } from './types';"
            }
        );
    }
}
