use apiform_core::{
    codegen::{Artifact, ArtifactKind, Code, Generator, GeneratorContext, GeneratorKind},
    signature::Signature,
};
use indoc::formatdoc;
use itertools::Itertools;

use super::{
    emit::{TsModule, jsdoc, string_lit},
    naming::{CodegenTypeName, arguments, hook_name, parameters, type_imports},
};

/// Generates `hooks.ts`: a React Query hook for every endpoint.
///
/// Queries are keyed by their category, then their domain tags, then
/// their arguments. Mutations invalidate every cached query that
/// shares one of their domain tags before calling the caller's
/// `onSuccess`.
pub struct CodegenHooks<'a> {
    cx: GeneratorContext<'a>,
}

impl<'a> CodegenHooks<'a> {
    pub fn new(cx: GeneratorContext<'a>) -> Self {
        Self { cx }
    }

    fn query_hook(&self, sig: &Signature<'_>) -> String {
        let response = CodegenTypeName::Response(sig.name);
        let key = std::iter::once(string_lit(sig.category.as_str()))
            .chain(sig.invalidation_tags().map(string_lit))
            .chain(sig.call_arguments().iter().map(|arg| arg.name().to_owned()))
            .join(", ");
        let params = parameters(sig)
            .into_iter()
            .chain(std::iter::once(format!(
                "options?: Omit<UseQueryOptions<{response}>, 'queryKey' | 'queryFn'>"
            )))
            .format_with("", |param, f| f(&format_args!("  {param},\n")));
        formatdoc! {"
            {doc}export function {hook}(
            {params}) {{
              return useQuery({{
                queryKey: [{key}] as const,
                queryFn: () => apiClient.{name}({args}),
                ...options,
              }});
            }}",
            doc = jsdoc("", sig.endpoint.description.as_deref(), &sig.endpoint.tags),
            hook = hook_name(sig, &self.cx.options().hook_prefix),
            name = sig.name,
            args = arguments(sig),
        }
    }

    fn mutation_hook(&self, sig: &Signature<'_>) -> String {
        let response = CodegenTypeName::Response(sig.name);
        let args = sig.call_arguments();
        let params = parameters(sig);
        let (variables, mutation_fn) = match (args.as_slice(), params.as_slice()) {
            ([], _) => (
                "void".to_owned(),
                format!("() => apiClient.{}()", sig.name),
            ),
            ([arg], [param]) => (
                CodegenTypeName::Argument(sig.name, *arg).to_string(),
                format!("({param}) => apiClient.{}({})", sig.name, arg.name()),
            ),
            _ => {
                let variables = format!("{{ {} }}", params.join("; "));
                let call = args
                    .iter()
                    .map(|arg| format!("input.{}", arg.name()))
                    .join(", ");
                let mutation_fn =
                    format!("(input: {variables}) => apiClient.{}({call})", sig.name);
                (variables, mutation_fn)
            }
        };

        let tags = sig.invalidation_tags().collect_vec();
        let on_success = if tags.is_empty() {
            String::new()
        } else {
            let invalidations = tags.iter().format_with("", |tag, f| {
                f(&format_args!(
                    "      await queryClient.invalidateQueries({{ predicate: matchesTag({}) }});\n",
                    string_lit(tag),
                ))
            });
            formatdoc! {"
                    onSuccess: async (...args) => {{
                {invalidations}      return options?.onSuccess?.(...args);
                    }},
                "}
        };

        formatdoc! {"
            {doc}export function {hook}(
              options?: Omit<UseMutationOptions<{response}, Error, {variables}>, 'mutationFn'>,
            ) {{
              const queryClient = useQueryClient();
              return useMutation({{
                ...options,
                mutationFn: {mutation_fn},
            {on_success}  }});
            }}",
            doc = jsdoc("", sig.endpoint.description.as_deref(), &sig.endpoint.tags),
            hook = hook_name(sig, &self.cx.options().hook_prefix),
        }
    }
}

impl Code for CodegenHooks<'_> {
    fn path(&self) -> &str {
        ArtifactKind::Hooks.file_name()
    }

    fn into_string(self) -> String {
        let sigs = self.cx.signatures().collect_vec();
        let has_queries = sigs.iter().any(|sig| sig.is_query());
        let has_mutations = sigs.iter().any(|sig| !sig.is_query());
        let invalidates = sigs
            .iter()
            .any(|sig| !sig.is_query() && sig.invalidation_tags().next().is_some());

        let mut module = TsModule::new(self.cx, ArtifactKind::Hooks);
        module
            .import(
                [
                    (has_queries, "useQuery"),
                    (has_mutations, "useMutation"),
                    (has_mutations, "useQueryClient"),
                ]
                .into_iter()
                .filter_map(|(used, name)| used.then_some(name)),
                "@tanstack/react-query",
            )
            .import_type(
                [
                    (has_queries, "UseQueryOptions"),
                    (has_mutations, "UseMutationOptions"),
                ]
                .into_iter()
                .filter_map(|(used, name)| used.then_some(name)),
                "@tanstack/react-query",
            )
            .import(["apiClient"], ArtifactKind::Client.module())
            .import(
                invalidates.then_some("matchesTag"),
                ArtifactKind::Runtime.module(),
            )
            .import_type(type_imports(sigs.iter().copied()), ArtifactKind::Types.module());
        for sig in &sigs {
            if sig.is_query() {
                module.item(self.query_hook(sig));
            } else {
                module.item(self.mutation_hook(sig));
            }
        }
        module.into_string()
    }
}

/// Emits `hooks.ts`.
#[derive(Clone, Copy, Debug)]
pub struct HooksGenerator<'a> {
    cx: GeneratorContext<'a>,
}

impl<'a> HooksGenerator<'a> {
    pub fn new(cx: GeneratorContext<'a>) -> Self {
        Self { cx }
    }
}

impl Generator for HooksGenerator<'_> {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Hooks
    }

    fn artifacts(&self) -> Vec<Artifact> {
        vec![Artifact::from_code(
            ArtifactKind::Hooks,
            CodegenHooks::new(self.cx),
        )]
    }
}
