use apiform_core::{
    codegen::{Artifact, ArtifactKind, Code, Generator, GeneratorContext, GeneratorKind},
    signature::Signature,
};
use indoc::indoc;
use itertools::Itertools;

use super::{
    emit::{TsModule, jsdoc},
    naming::CodegenTypeName,
};

const EXTRACTORS: &str = indoc! {"
    export type APIEndpoints = (typeof apiConfig)['endpoints'];

    export type EndpointName = keyof APIEndpoints;

    type Input<S> = S extends z.ZodType ? z.input<S> : never;
    type Output<S> = S extends z.ZodType ? z.output<S> : never;

    export type ExtractParams<E> = E extends { params: infer S } ? Input<S> : never;
    export type ExtractQuery<E> = E extends { query: infer S } ? Input<S> : never;
    export type ExtractBody<E> = E extends { body: infer S } ? Input<S> : never;
    export type ExtractResponse<E> = E extends { response: infer S }
      ? Output<S>
      : never;
"};

/// Generates `types.ts`: types extracted from the endpoint schemas,
/// with one alias per part of each endpoint.
pub struct CodegenTypes<'a> {
    cx: GeneratorContext<'a>,
}

impl<'a> CodegenTypes<'a> {
    pub fn new(cx: GeneratorContext<'a>) -> Self {
        Self { cx }
    }
}

fn aliases(sig: &Signature<'_>) -> String {
    let doc = jsdoc("", sig.endpoint.description.as_deref(), &[]);
    let lines = CodegenTypeName::for_signature(sig).format_with("\n", |name, f| {
        f(&format_args!(
            "export type {name} = {}<APIEndpoints['{}']>;",
            name.extractor(),
            sig.name,
        ))
    });
    format!("{doc}{lines}")
}

impl Code for CodegenTypes<'_> {
    fn path(&self) -> &str {
        ArtifactKind::Types.file_name()
    }

    fn into_string(self) -> String {
        let mut module = TsModule::new(self.cx, ArtifactKind::Types);
        module
            .import_type(["z"], "zod")
            .import_type(["apiConfig"], ArtifactKind::Runtime.module())
            .item(EXTRACTORS);
        for sig in self.cx.signatures() {
            module.item(aliases(&sig));
        }
        module.into_string()
    }
}

/// Emits `types.ts`.
#[derive(Clone, Copy, Debug)]
pub struct TypesGenerator<'a> {
    cx: GeneratorContext<'a>,
}

impl<'a> TypesGenerator<'a> {
    pub fn new(cx: GeneratorContext<'a>) -> Self {
        Self { cx }
    }
}

impl Generator for TypesGenerator<'_> {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Types
    }

    fn artifacts(&self) -> Vec<Artifact> {
        vec![Artifact::from_code(
            ArtifactKind::Types,
            CodegenTypes::new(self.cx),
        )]
    }
}
