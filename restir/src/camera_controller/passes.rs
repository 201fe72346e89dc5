use log::debug;

macro_rules! passes {
    ([ $( $name:ident => $class:ident, )* ]) => {
        $( mod $name; )*
        $( pub use self::$name::*; )*

        #[derive(Debug)]
        pub struct CameraPasses {
            $( pub $name: $class, )*
        }

        impl CameraPasses {
            pub fn new() -> Self {
                debug!("Initializing camera passes");

                Self {
                    $( $name: $class::new(), )*
                }
            }
        }

        impl Default for CameraPasses {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

passes!([
    generation => GenerationPass,
    resolving => ResolvingPass,
    spatial_resampling => SpatialResamplingPass,
    temporal_resampling => TemporalResamplingPass,
]);
