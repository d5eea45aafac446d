use super::Error;
use crate::nodes::NodeDescriptor;

/// Lists the names of all extended attributes of a node, in stored order.
pub(crate) fn list(descriptor: &NodeDescriptor) -> Vec<&str> {
    descriptor
        .extended_attributes
        .iter()
        .map(|attr| attr.name.as_str())
        .collect()
}

/// Looks up the value of the extended attribute with exactly that name.
pub(crate) fn get<'a>(descriptor: &'a NodeDescriptor, name: &str) -> Result<&'a [u8], Error> {
    descriptor
        .get_extended_attribute(name)
        .ok_or_else(|| Error::NoSuchAttribute(name.to_string()))
}
