use crate::metadata::{Collection, MetadataStore, ITEM_TYPE_MEDIUM_FIELD};
use crate::model::{MediumContext, ReferenceItem};
use crate::view::{ControlId, PageView};

/// Re-populates the dropdowns that depend on the medium selector.
///
/// Status is rebuilt from the full collection; item types are restricted to
/// the selected medium unless the context is "all". Runs with "all" on page
/// load and again on every medium change.
pub fn apply_medium_filter(page: &mut PageView, metadata: &MetadataStore, context: &MediumContext) {
    let status = Collection::StatusType;
    page.populate(
        ControlId::SearchStatus,
        metadata.items(status),
        status.value_field(),
        status.label_field(),
        None,
    );

    populate_item_types(page, ControlId::SearchItemType, metadata, context);
}

/// Populates an item-type control with the types belonging to `context`.
pub fn populate_item_types(
    page: &mut PageView,
    control: ControlId,
    metadata: &MetadataStore,
    context: &MediumContext,
) {
    let item_type = Collection::ItemType;
    let in_medium: &dyn Fn(&ReferenceItem) -> bool =
        &|item| context.admits(&item.field_string(ITEM_TYPE_MEDIUM_FIELD));
    page.populate(
        control,
        metadata.items(item_type),
        item_type.value_field(),
        item_type.label_field(),
        Some(in_medium),
    );
}
