//! Console-side models that are not backend rows.

pub mod member_form;

pub use member_form::{
    FieldErrors, FormField, MemberEdit, MemberFlags, MemberForm, MemberPayload, MemberUpdate,
    NewMember,
};
