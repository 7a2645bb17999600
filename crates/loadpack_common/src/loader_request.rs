//! Loader request strings: `loader-a!loader-b!/abs/path/to/resource.js`.

use anyhow::bail;

pub const LOADER_DELIMITER: char = '!';

/// Join the loader chain and the resource into a request string.
pub fn build_loader_request<S: AsRef<str>>(loaders: &[S], resource: &str) -> String {
  let mut request = String::with_capacity(
    loaders.iter().map(|loader| loader.as_ref().len() + 1).sum::<usize>() + resource.len(),
  );
  for loader in loaders {
    request.push_str(loader.as_ref());
    request.push(LOADER_DELIMITER);
  }
  request.push_str(resource);
  request
}

/// The resolved-file segment of a request: everything after the last `!`.
pub fn request_resource(request: &str) -> anyhow::Result<&str> {
  let Some((_, resource)) = request.rsplit_once(LOADER_DELIMITER) else {
    bail!("Loader request {request:?} has no `{LOADER_DELIMITER}` separating loaders from the resource");
  };
  if resource.is_empty() {
    bail!("Loader request {request:?} names no resource");
  }
  Ok(resource)
}

/// The bare file name of the request's resource, e.g. `app.js` for
/// `babel-loader!/project/src/app.js`.
pub fn request_filename(request: &str) -> anyhow::Result<&str> {
  let resource = request_resource(request)?;
  match resource.rsplit(['/', '\\']).next() {
    Some(filename) if !filename.is_empty() => Ok(filename),
    _ => bail!("Loader request {request:?} resolves to a directory, not a file"),
  }
}
