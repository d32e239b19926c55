use std::cell::Cell;

use crashsym::symbolication::{
    find_symbol, FoundMethod, FoundSymbol, MethodCache, MethodMetadata, NativeSymbols, SymbolCache,
};
use crashsym_common::{Address, MethodKind, StringHandle, SymbolError};

/// Class or method name as reported by the fake method provider.
#[derive(Clone, Copy)]
enum Name {
    Ok(&'static str),
    Unreadable,
}

impl StringHandle for Name {
    fn length(&self) -> Result<usize, SymbolError> {
        match self {
            Name::Ok(text) => Ok(text.len()),
            Name::Unreadable => Err(SymbolError::InvalidData),
        }
    }

    fn bytes(&self) -> Result<&[u8], SymbolError> {
        match self {
            Name::Ok(text) => Ok(text.as_bytes()),
            Name::Unreadable => Err(SymbolError::InvalidData),
        }
    }
}

#[derive(Clone, Copy)]
struct FakeMethod {
    kind: MethodKind,
    class_name: Name,
    method_name: Name,
    imp: Address,
}

/// Image whose providers return scripted results and count their calls.
///
/// `method_after_probe` replaces the method provider's answer on every call
/// after the first, to model a provider that matches when probed but fails
/// when asked to resolve.
struct FakeImage {
    native: Result<(Address, &'static str), SymbolError>,
    method: Result<FakeMethod, SymbolError>,
    method_after_probe: Option<Result<FakeMethod, SymbolError>>,
    native_calls: Cell<usize>,
    method_calls: Cell<usize>,
}

impl FakeImage {
    fn new(
        native: Result<(Address, &'static str), SymbolError>,
        method: Result<FakeMethod, SymbolError>,
    ) -> Self {
        Self {
            native,
            method,
            method_after_probe: None,
            native_calls: Cell::new(0),
            method_calls: Cell::new(0),
        }
    }
}

impl NativeSymbols for FakeImage {
    fn find_symbol(&self, _pc: Address, found: FoundSymbol<'_>) -> Result<(), SymbolError> {
        self.native_calls.set(self.native_calls.get() + 1);
        let (address, name) = self.native?;
        found(address, name.as_bytes());
        Ok(())
    }
}

impl MethodMetadata for FakeImage {
    fn find_method(
        &self,
        _cache: &mut MethodCache,
        _pc: Address,
        found: FoundMethod<'_>,
    ) -> Result<(), SymbolError> {
        let call = self.method_calls.get();
        self.method_calls.set(call + 1);

        let method = match self.method_after_probe {
            Some(later) if call > 0 => later?,
            _ => self.method?,
        };

        found(method.kind, &method.class_name, &method.method_name, method.imp);
        Ok(())
    }
}

fn instance_method(
    class_name: &'static str,
    method_name: &'static str,
    imp: Address,
) -> FakeMethod {
    FakeMethod {
        kind: MethodKind::Instance,
        class_name: Name::Ok(class_name),
        method_name: Name::Ok(method_name),
        imp,
    }
}

fn resolve(image: &FakeImage) -> (Result<(), SymbolError>, Vec<(Address, String)>) {
    let mut cache = SymbolCache::init().expect("cache init");
    let mut calls = Vec::new();
    let result = find_symbol(image, &mut cache, 0x2010, &mut |address, name| {
        calls.push((address, String::from_utf8_lossy(name).into_owned()));
    });
    cache.free();
    (result, calls)
}

#[test]
fn test_method_wins_when_closer() {
    let image = FakeImage::new(Ok((0x1000, "_start")), Ok(instance_method("Foo", "bar:", 0x2000)));

    let (result, calls) = resolve(&image);

    assert_eq!(result, Ok(()));
    assert_eq!(calls, vec![(0x2000, "-[Foo bar:]".to_string())]);
    // Probe only; the name came from the method provider
    assert_eq!(image.native_calls.get(), 1);
    assert_eq!(image.method_calls.get(), 2);
}

#[test]
fn test_method_wins_ties() {
    let image = FakeImage::new(Ok((0x2000, "_start")), Ok(instance_method("Foo", "bar:", 0x2000)));

    let (_, calls) = resolve(&image);
    assert_eq!(calls, vec![(0x2000, "-[Foo bar:]".to_string())]);
}

#[test]
fn test_class_method_descriptor() {
    let method = FakeMethod { kind: MethodKind::Class, ..instance_method("Foo", "shared", 0x2000) };
    let image = FakeImage::new(Err(SymbolError::NotFound), Ok(method));

    let (_, calls) = resolve(&image);
    assert_eq!(calls, vec![(0x2000, "+[Foo shared]".to_string())]);
}

#[test]
fn test_native_wins_when_strictly_higher() {
    let image =
        FakeImage::new(Ok((0x2008, "_helper")), Ok(instance_method("Foo", "bar:", 0x2000)));

    let (result, calls) = resolve(&image);

    assert_eq!(result, Ok(()));
    assert_eq!(calls, vec![(0x2008, "_helper".to_string())]);
    assert_eq!(image.method_calls.get(), 1);
}

#[test]
fn test_native_wins_when_method_probe_fails() {
    let image = FakeImage::new(Ok((0x10, "_start")), Err(SymbolError::NotFound));

    let (result, calls) = resolve(&image);

    assert_eq!(result, Ok(()));
    assert_eq!(calls, vec![(0x10, "_start".to_string())]);
}

#[test]
fn test_method_wins_when_native_fails() {
    let image =
        FakeImage::new(Err(SymbolError::NotFound), Ok(instance_method("Foo", "bar:", 0x3000)));

    let (result, calls) = resolve(&image);

    assert_eq!(result, Ok(()));
    assert_eq!(calls, vec![(0x3000, "-[Foo bar:]".to_string())]);
}

#[test]
fn test_both_fail_reports_native_error() {
    let image = FakeImage::new(Err(SymbolError::Access), Err(SymbolError::InvalidData));

    let (result, calls) = resolve(&image);

    assert_eq!(result, Err(SymbolError::Access));
    assert!(calls.is_empty());
    assert_eq!(image.native_calls.get(), 1);
    assert_eq!(image.method_calls.get(), 1);
}

#[test]
fn test_unreadable_class_name_falls_back_to_native() {
    let method = FakeMethod { class_name: Name::Unreadable, ..instance_method("", "bar:", 0x2000) };
    let image = FakeImage::new(Ok((0x1000, "_start")), Ok(method));

    let (result, calls) = resolve(&image);

    assert_eq!(result, Ok(()));
    assert_eq!(calls, vec![(0x1000, "_start".to_string())]);
    assert_eq!(image.native_calls.get(), 2);
}

#[test]
fn test_unreadable_method_name_falls_back_to_native() {
    let method = FakeMethod { method_name: Name::Unreadable, ..instance_method("Foo", "", 0x2000) };
    let image = FakeImage::new(Ok((0x1000, "_start")), Ok(method));

    let (_, calls) = resolve(&image);
    assert_eq!(calls, vec![(0x1000, "_start".to_string())]);
}

#[test]
fn test_zero_imp_falls_back_to_native() {
    let image = FakeImage::new(Ok((0x0, "_zero")), Ok(instance_method("Foo", "bar:", 0)));

    let (result, calls) = resolve(&image);

    assert_eq!(result, Ok(()));
    assert_eq!(calls, vec![(0x0, "_zero".to_string())]);
}

#[test]
fn test_method_resolve_failure_falls_back_to_native() {
    let mut image =
        FakeImage::new(Ok((0x1000, "_start")), Ok(instance_method("Foo", "bar:", 0x2000)));
    image.method_after_probe = Some(Err(SymbolError::Internal));

    let (result, calls) = resolve(&image);

    assert_eq!(result, Ok(()));
    assert_eq!(calls, vec![(0x1000, "_start".to_string())]);
}

#[test]
fn test_fallback_failure_invokes_nothing() {
    let image = FakeImage::new(Err(SymbolError::NotFound), Ok(instance_method("Foo", "bar:", 0)));

    let (result, calls) = resolve(&image);

    assert_eq!(result, Err(SymbolError::NotFound));
    assert!(calls.is_empty());
    assert_eq!(image.native_calls.get(), 2);
}

#[test]
fn test_long_descriptor_truncated_to_buffer() {
    const CLASS: &str = "AVeryLongClassNameThatKeepsGoingAndGoingAndGoingForeverAndEver";
    const METHOD: &str = "withAnEquallyLongSelector:thatHasManyParts:andStillMore:andMore:";
    let image =
        FakeImage::new(Err(SymbolError::NotFound), Ok(instance_method(CLASS, METHOD, 0x2000)));

    let (result, calls) = resolve(&image);

    assert_eq!(result, Ok(()));
    let name = &calls[0].1;
    assert_eq!(name.len(), 127);
    assert!(name.starts_with("-[AVeryLongClassName"));
    assert!(!name.ends_with(']'));
}

#[test]
fn test_callback_invoked_at_most_once() {
    let native_results =
        [Ok((0x1000, "_start")), Ok((0x3000, "_late")), Err(SymbolError::NotFound)];
    let method_results = [
        Ok(instance_method("Foo", "bar:", 0x2000)),
        Ok(instance_method("Foo", "bar:", 0)),
        Ok(FakeMethod { class_name: Name::Unreadable, ..instance_method("", "x", 0x2000) }),
        Err(SymbolError::NotFound),
    ];

    for native in native_results {
        for method in method_results {
            let image = FakeImage::new(native, method);
            let (result, calls) = resolve(&image);

            assert!(calls.len() <= 1);
            assert_eq!(result.is_ok(), calls.len() == 1);
        }
    }
}
