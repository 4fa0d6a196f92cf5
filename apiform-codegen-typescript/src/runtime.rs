use apiform_core::{
    codegen::{Artifact, ArtifactKind, Code, Generator, GeneratorContext, GeneratorKind},
    config::Provider,
    registry::EndpointDescriptor,
};
use indoc::{formatdoc, indoc};
use itertools::Itertools;

use super::emit::{TsModule, string_lit};

/// Declarations that every other artifact builds on.
const DEFINITIONS: &str = indoc! {"
    export type HTTPMethod = 'GET' | 'POST' | 'PUT' | 'PATCH' | 'DELETE';

    export interface EndpointDefinition {
      path: string;
      method: HTTPMethod;
      baseUrl?: string;
      params?: z.ZodType;
      query?: z.ZodType;
      body?: z.ZodType;
      response: z.ZodType;
      tags?: readonly string[];
      description?: string;
    }

    export interface APIConfigDefinition {
      baseUrl: string;
      endpoints: Record<string, EndpointDefinition>;
    }
"};

/// The request client, and the helpers it uses.
const CLIENT: &str = indoc! {r#"
    export type APIConfig = typeof apiConfig;

    export interface AuthTokens {
      accessToken: string;
      refreshToken?: string;
    }

    export interface AuthCallbacks {
      /** Returns the tokens to send with each request. */
      getTokens: () => AuthTokens | null | Promise<AuthTokens | null>;
      /** Called when a request is still unauthorized after refreshing. */
      onAuthError?: () => void;
      /** Returns a fresh access token, or `null` if refreshing failed. */
      onRefreshToken?: () => Promise<string | null>;
    }

    /** A request that completed with a non-2xx status. */
    export class APIError extends Error {
      constructor(
        message: string,
        public readonly status: number,
        public readonly body?: unknown,
      ) {
        super(message);
        this.name = 'APIError';
      }
    }

    /** Replaces `:name` and `{name}` placeholders with encoded values. */
    export function buildPath(
      path: string,
      params?: Record<string, unknown>,
    ): string {
      return path.replace(
        /:([A-Za-z0-9_]+)|\{([^{}]+)\}/g,
        (_match, colon?: string, braced?: string) => {
          const key = colon ?? braced ?? '';
          const value = params?.[key];
          if (value === undefined || value === null) {
            throw new Error(`Missing path parameter \`${key}\` for \`${path}\``);
          }
          return encodeURIComponent(String(value));
        },
      );
    }

    function toQueryString(query?: Record<string, unknown>): string {
      if (!query) return '';
      const search = new URLSearchParams();
      for (const [key, value] of Object.entries(query)) {
        if (value === undefined || value === null) continue;
        if (Array.isArray(value)) {
          for (const item of value) search.append(key, String(item));
        } else {
          search.append(key, String(value));
        }
      }
      const text = search.toString();
      return text ? `?${text}` : '';
    }

    /**
     * Returns a predicate that matches cached queries in a tag's group.
     * Query keys start with the endpoint's category, followed by its
     * domain tags.
     */
    export function matchesTag(tag: string) {
      return (query: { queryKey: readonly unknown[] }) =>
        query.queryKey.includes(tag);
    }

    interface EndpointArgs {
      params?: unknown;
      query?: unknown;
      body?: unknown;
    }

    /** Maps positional arguments to the parts an endpoint takes. */
    function toArgs(endpoint: EndpointDefinition, args: unknown[]): EndpointArgs {
      const result: EndpointArgs = {};
      let index = 0;
      if (endpoint.params) result.params = args[index++];
      if (endpoint.query) result.query = args[index++];
      if (endpoint.body) result.body = args[index++];
      return result;
    }

    /**
     * Creates a client with one method per endpoint. Each method
     * validates its inputs and the response with the endpoint's schemas.
     */
    export function createAPIClient<C extends APIConfigDefinition>(
      config: C,
      authCallbacks?: AuthCallbacks,
    ) {
      let callbacks = authCallbacks;
      let refreshing: Promise<string | null> | null = null;

      const refresh = (): Promise<string | null> => {
        if (!callbacks?.onRefreshToken) return Promise.resolve(null);
        refreshing ??= callbacks.onRefreshToken().finally(() => {
          refreshing = null;
        });
        return refreshing;
      };

      const request = async (
        endpoint: EndpointDefinition,
        args: EndpointArgs,
      ): Promise<unknown> => {
        const params = endpoint.params?.parse(args.params) as
          | Record<string, unknown>
          | undefined;
        const query =
          args.query === undefined
            ? undefined
            : (endpoint.query?.parse(args.query) as
                | Record<string, unknown>
                | undefined);
        const body = endpoint.body?.parse(args.body);
        const url =
          (endpoint.baseUrl ?? config.baseUrl) +
          buildPath(endpoint.path, params) +
          toQueryString(query);

        const send = (token?: string | null) => {
          const headers: Record<string, string> = { Accept: 'application/json' };
          if (body !== undefined) headers['Content-Type'] = 'application/json';
          if (token) headers.Authorization = `Bearer ${token}`;
          return fetch(url, {
            method: endpoint.method,
            headers,
            body: body === undefined ? undefined : JSON.stringify(body),
          });
        };

        const tokens = await callbacks?.getTokens();
        let response = await send(tokens?.accessToken);
        if (response.status === 401 && callbacks?.onRefreshToken) {
          const token = await refresh();
          if (token) response = await send(token);
        }
        if (response.status === 401) callbacks?.onAuthError?.();
        if (!response.ok) {
          const errorBody = await response.json().catch(() => undefined);
          throw new APIError(
            `${endpoint.method} ${endpoint.path} failed with status ${response.status}`,
            response.status,
            errorBody,
          );
        }

        const data = response.status === 204 ? undefined : await response.json();
        return endpoint.response.parse(data);
      };

      const methods = Object.fromEntries(
        Object.entries(config.endpoints).map(([name, endpoint]) => [
          name,
          (...args: unknown[]) => request(endpoint, toArgs(endpoint, args)),
        ]),
      );

      return {
        ...methods,
        refreshAuth: async (): Promise<void> => {
          await refresh();
        },
        updateAuthCallbacks: (next: AuthCallbacks): void => {
          callbacks = next;
        },
      };
    }
"#};

/// Generates `runtime.ts`: the endpoint definitions as data, and the
/// request client that interprets them.
pub struct CodegenRuntime<'a> {
    cx: GeneratorContext<'a>,
}

impl<'a> CodegenRuntime<'a> {
    pub fn new(cx: GeneratorContext<'a>) -> Self {
        Self { cx }
    }

    fn base_url(&self) -> String {
        let literal = string_lit(self.cx.base_url());
        match &self.cx.config().base_url_env {
            Some(var) => {
                let env = match self.cx.provider() {
                    Provider::Nextjs => "process.env",
                    Provider::Vite => "import.meta.env",
                };
                format!("{env}.{var} ?? {literal}")
            }
            None => literal,
        }
    }

    fn api_config(&self) -> String {
        let endpoints = self
            .cx
            .registry()
            .endpoints()
            .map(|(name, endpoint)| endpoint_literal(name, endpoint))
            .collect_vec();
        let endpoints = if endpoints.is_empty() {
            "{}".to_owned()
        } else {
            format!("{{\n{}  }}", endpoints.join(""))
        };
        formatdoc! {"
            export const apiConfig = {{
              baseUrl: {base_url},
              endpoints: {endpoints},
            }} as const satisfies APIConfigDefinition;",
            base_url = self.base_url(),
        }
    }
}

/// Formats one entry of the `endpoints` object, indented to sit
/// inside it.
fn endpoint_literal(name: &str, endpoint: &EndpointDescriptor) -> String {
    let mut fields = vec![
        format!("path: {}", string_lit(&endpoint.path)),
        format!("method: {}", string_lit(endpoint.method.as_str())),
    ];
    if let Some(base_url) = &endpoint.base_url {
        fields.push(format!("baseUrl: {}", string_lit(base_url)));
    }
    for (field, schema) in [
        ("params", &endpoint.params),
        ("query", &endpoint.query),
        ("body", &endpoint.body),
    ] {
        if let Some(schema) = schema {
            fields.push(format!("{field}: {schema}"));
        }
    }
    fields.push(format!("response: {}", endpoint.response));
    if !endpoint.tags.is_empty() {
        fields.push(format!(
            "tags: [{}]",
            endpoint.tags.iter().map(|tag| string_lit(tag)).join(", ")
        ));
    }
    if let Some(description) = &endpoint.description {
        fields.push(format!("description: {}", string_lit(description)));
    }
    format!(
        "    {name}: {{\n{}    }},\n",
        fields
            .iter()
            .format_with("", |field, f| f(&format_args!("      {field},\n")))
    )
}

impl Code for CodegenRuntime<'_> {
    fn path(&self) -> &str {
        ArtifactKind::Runtime.file_name()
    }

    fn into_string(self) -> String {
        let schemas = self
            .cx
            .registry()
            .endpoints()
            .flat_map(|(_, endpoint)| endpoint.schemas())
            .map(|schema| schema.as_str());

        let mut module = TsModule::new(self.cx, ArtifactKind::Runtime);
        module
            .import_type(["z"], "zod")
            .import(schemas, &self.cx.options().schemas_module)
            .item(DEFINITIONS)
            .item(self.api_config())
            .item(CLIENT);
        module.into_string()
    }
}

/// Emits `runtime.ts`.
#[derive(Clone, Copy, Debug)]
pub struct RuntimeGenerator<'a> {
    cx: GeneratorContext<'a>,
}

impl<'a> RuntimeGenerator<'a> {
    pub fn new(cx: GeneratorContext<'a>) -> Self {
        Self { cx }
    }
}

impl Generator for RuntimeGenerator<'_> {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Runtime
    }

    fn artifacts(&self) -> Vec<Artifact> {
        vec![Artifact::from_code(
            ArtifactKind::Runtime,
            CodegenRuntime::new(self.cx),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    use crate::tests::{Fixture, NEXTJS, USERS, VITE};

    #[test]
    fn test_api_config_literal() {
        let fixture = Fixture::new(
            VITE,
            indoc! {"
                baseUrl: https://api.example.com
                endpoints:
                  getUserAvatar:
                    path: /users/:id/avatar
                    method: GET
                    baseUrl: https://cdn.example.com
                    params: UserIdParamsSchema
                    response: AvatarSchema
                    tags: [users, query]
                    description: Get user avatar URL from the CDN
                  logout:
                    path: /auth/logout
                    method: POST
                    response: SuccessSchema
            "},
        );

        assert_eq!(
            CodegenRuntime::new(fixture.cx()).api_config(),
            indoc! {"
                export const apiConfig = {
                  baseUrl: 'https://api.example.com',
                  endpoints: {
                    getUserAvatar: {
                      path: '/users/:id/avatar',
                      method: 'GET',
                      baseUrl: 'https://cdn.example.com',
                      params: UserIdParamsSchema,
                      response: AvatarSchema,
                      tags: ['users', 'query'],
                      description: 'Get user avatar URL from the CDN',
                    },
                    logout: {
                      path: '/auth/logout',
                      method: 'POST',
                      response: SuccessSchema,
                    },
                  },
                } as const satisfies APIConfigDefinition;"
            }
        );
    }

    #[test]
    fn test_empty_registry() {
        let fixture = Fixture::new(VITE, "baseUrl: https://api.example.com\nendpoints: {}\n");
        let runtime = CodegenRuntime::new(fixture.cx());

        assert!(runtime.api_config().contains("  endpoints: {},\n"));
        let text = runtime.into_string();
        assert!(!text.contains("from '../schemas'"));
    }

    #[test]
    fn test_schema_imports_are_sorted_and_deduplicated() {
        let fixture = Fixture::new(NEXTJS, USERS);
        let text = CodegenRuntime::new(fixture.cx()).into_string();

        assert!(text.starts_with(indoc! {"
            import type { z } from 'zod';
            import { CreateUserSchema, UserIdParamsSchema, UserSchema } from '../schemas';

            export type HTTPMethod
        "}.trim_end()));
    }

    #[test]
    fn test_base_url_env_nextjs() {
        let config = format!("{NEXTJS}base-url-env = \"NEXT_PUBLIC_API_URL\"\n");
        let fixture = Fixture::new(&config, USERS);

        assert_eq!(
            CodegenRuntime::new(fixture.cx()).base_url(),
            "process.env.NEXT_PUBLIC_API_URL ?? 'https://api.example.com'"
        );
    }

    #[test]
    fn test_base_url_env_vite() {
        let config = format!(
            "{VITE}base-url = \"http://localhost:3000/api\"\nbase-url-env = \"VITE_API_URL\"\n"
        );
        let fixture = Fixture::new(&config, USERS);

        assert_eq!(
            CodegenRuntime::new(fixture.cx()).base_url(),
            "import.meta.env.VITE_API_URL ?? 'http://localhost:3000/api'"
        );
    }

    #[test]
    fn test_runtime_is_never_client_side() {
        let fixture = Fixture::new(VITE, USERS);
        let text = CodegenRuntime::new(fixture.cx()).into_string();

        assert!(!text.contains("'use client'"));
        assert!(text.contains("export function createAPIClient"));
        assert!(text.contains("export function matchesTag"));
    }
}
