/// Something that can be invoked with a signal's argument tuple.
///
/// Implemented for every `Fn` of arity 0 through 6 taking the unpacked tuple, so
/// `fn(i32, String)` and `|a: i32, b: String| ...` are both `Handler<(i32, String)>`.
/// Types that want to behave like functors implement it directly.
pub trait Handler<Args> {
    fn handle(&self, args: Args);
}

/// A method-like callable that receives its owner followed by the unpacked arguments.
///
/// Method paths such as `Widget::on_resize` (taking `&self`) implement this for the
/// tuple of their remaining parameters.
pub trait MethodHandler<T: ?Sized, Args> {
    fn handle(&self, owner: &T, args: Args);
}

macro_rules! handler_arity {
    ($($ty:ident $val:ident),*) => {
        impl<F, $($ty),*> Handler<($($ty,)*)> for F
        where F: ?Sized + Fn($($ty),*)
        {
            fn handle(&self, ($($val,)*): ($($ty,)*)) { self($($val),*) }
        }

        impl<F, T: ?Sized, $($ty),*> MethodHandler<T, ($($ty,)*)> for F
        where F: Fn(&T, $($ty),*)
        {
            fn handle(&self, owner: &T, ($($val,)*): ($($ty,)*)) { self(owner, $($val),*) }
        }
    };
}

handler_arity!();
handler_arity!(A1 a1);
handler_arity!(A1 a1, A2 a2);
handler_arity!(A1 a1, A2 a2, A3 a3);
handler_arity!(A1 a1, A2 a2, A3 a3, A4 a4);
handler_arity!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5);
handler_arity!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6);
