//! The request pipeline
//!
//! One sequential execution per request:
//! Authorizing → BuildingQuery → Fetching → PreparingData → Serializing →
//! Done, with errors terminating immediately. Hooks resolved from the
//! extension registry act in two places: list-spec mutation and serializer
//! overrides during BuildingQuery, result mutation during PreparingData.

use crate::app::App;
use crate::controller::{ApiController, ListSpec};
use agora_auth::Actor;
use agora_core::{Error, Request, Result};
use agora_extend::{Hook, PrepareContext};
use agora_model::{FetchResult, Filter, FilterOperator, Query, SortOrder};
use agora_rest::{Document, ResourceSerializer, render};
use serde_json::Map;

pub(crate) async fn run(
	app: &App,
	controller: &dyn ApiController,
	request: &Request,
	actor: &Actor,
) -> Result<Document> {
	// Authorizing
	if let Some(ability) = controller.ability()
		&& !app.allows(actor, ability)
	{
		return Err(Error::PermissionDenied(format!(
			"actor lacks the `{ability}` ability"
		)));
	}

	// BuildingQuery
	let lineage = controller.lineage();
	let hooks = app.extensions().resolve(&lineage);
	tracing::trace!(
		controller = controller.key(),
		hooks = hooks.len(),
		"building query"
	);

	let mut spec = controller.list_spec(app.settings());
	let mut serializer_override: Option<Box<dyn ResourceSerializer>> = None;
	for hook in &hooks {
		apply_hook(hook, &mut spec, &mut serializer_override);
	}
	let query = build_query(controller.resource_type(), &spec, request)?;

	// Fetching
	let mut result = controller.load(request, &query, app).await?;

	// PreparingData
	{
		let mut ctx = PrepareContext::new(controller.key(), app.store(), &mut serializer_override);
		for hook in &hooks {
			if let Hook::PrepareData(callback) = hook {
				callback(&mut ctx, &mut result);
			}
		}
	}

	// Serializing
	let serializer =
		serializer_override.unwrap_or_else(|| controller.default_serializer());
	let mut document = render(&result, serializer.as_ref(), &query.includes, app.serializers());
	if let FetchResult::Many { total, .. } = &result {
		let mut meta = Map::new();
		meta.insert("total".to_string(), (*total).into());
		document = document.with_meta(meta);
	}

	Ok(document)
}

/// Apply one resolved hook to the request's list spec
///
/// Hooks arrive in resolution order, so a later hook overwrites whatever
/// an earlier one did to the same slot.
fn apply_hook(
	hook: &Hook,
	spec: &mut ListSpec,
	serializer: &mut Option<Box<dyn ResourceSerializer>>,
) {
	match hook {
		Hook::PrepareData(_) => {}
		Hook::SetSerializer { factory, when } => {
			if when.as_ref().is_none_or(|when| when()) {
				*serializer = Some(factory());
			}
		}
		Hook::AddInclude(name) => {
			if !spec.includes.contains(name) {
				spec.includes.push(name.clone());
			}
			spec.removed_includes.retain(|n| n != name);
		}
		Hook::RemoveInclude(name) => {
			spec.includes.retain(|n| n != name);
			spec.removed_includes.push(name.clone());
		}
		Hook::AddOptionalInclude(name) => {
			if !spec.optional_includes.contains(name) {
				spec.optional_includes.push(name.clone());
			}
			spec.removed_includes.retain(|n| n != name);
		}
		Hook::RemoveOptionalInclude(name) => {
			spec.optional_includes.retain(|n| n != name);
			spec.removed_includes.push(name.clone());
		}
		Hook::AddSortField { name, when } => {
			if when.as_ref().is_none_or(|when| when())
				&& !spec.sort_fields.iter().any(|f| f.name == *name)
			{
				spec.sort_fields.push(crate::controller::ApiField::new(name.clone()));
			}
		}
		Hook::RemoveSortField(name) => {
			spec.sort_fields.retain(|f| f.name != *name);
		}
		Hook::SetSort(sort) => {
			spec.default_sort = sort.clone();
		}
		Hook::SetLimit(limit) => {
			spec.limit = *limit;
		}
		Hook::SetMaxLimit(limit) => {
			spec.max_limit = Some(*limit);
		}
	}
}

/// Validate the request against the hook-mutated spec and produce the
/// store query
fn build_query(resource: &str, spec: &ListSpec, request: &Request) -> Result<Query> {
	let mut query = Query::new(resource);

	// Sort
	if let Some(sort_param) = request.query_param("sort") {
		for raw in sort_param.split(',').filter(|s| !s.is_empty()) {
			let (name, order) = match raw.strip_prefix('-') {
				Some(name) => (name, SortOrder::Desc),
				None => (raw, SortOrder::Asc),
			};
			let field = spec
				.sort_fields
				.iter()
				.find(|f| f.name == name)
				.ok_or_else(|| {
					Error::InvalidParameter(format!("sort field `{name}` is not allowed"))
				})?;
			query = query.order_by(field.column.clone(), order);
		}
	} else {
		for (name, order) in &spec.default_sort {
			let column = spec
				.sort_fields
				.iter()
				.find(|f| f.name == *name)
				.map(|f| f.column.clone())
				.unwrap_or_else(|| crate::controller::snake_case(name));
			query = query.order_by(column, *order);
		}
	}

	// Page window
	let requested_limit = parse_page_param(request, "page[limit]")?;
	let mut limit = requested_limit.unwrap_or(spec.limit);
	if let Some(max) = spec.max_limit {
		limit = limit.min(max);
	}
	query = query.limit(limit);
	if let Some(offset) = parse_page_param(request, "page[offset]")? {
		query = query.offset(offset);
	}

	// Includes: hard defaults plus allowed optional requests
	let mut includes = spec.includes.clone();
	if let Some(include_param) = request.query_param("include") {
		for name in include_param.split(',').filter(|s| !s.is_empty()) {
			if spec.removed_includes.iter().any(|n| n == name) {
				return Err(Error::InvalidParameter(format!(
					"include `{name}` is not available"
				)));
			}
			if spec.optional_includes.iter().any(|n| n == name) {
				if !includes.iter().any(|n| n == name) {
					includes.push(name.to_string());
				}
			}
			// Unknown names fall through silently
		}
	}
	query.includes = includes;

	// Filters
	for (key, value) in &request.query_params {
		let Some(name) = key
			.strip_prefix("filter[")
			.and_then(|rest| rest.strip_suffix(']'))
		else {
			continue;
		};
		let field = spec
			.filter_fields
			.iter()
			.find(|f| f.name == name)
			.ok_or_else(|| {
				Error::InvalidParameter(format!("filter field `{name}` is not allowed"))
			})?;
		query = query.filter(Filter::new(
			field.column.clone(),
			FilterOperator::Eq,
			value.as_str(),
		));
	}

	Ok(query)
}

fn parse_page_param(request: &Request, name: &str) -> Result<Option<usize>> {
	let Some(raw) = request.query_param(name) else {
		return Ok(None);
	};
	raw.parse::<usize>().map(Some).map_err(|_| {
		Error::InvalidParameter(format!("`{name}` must be a non-negative integer"))
	})
}
